use bevy::prelude::*;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A length that can be given either as a string or a bare number.
#[derive(Debug, Clone, Default)]
pub struct CssValue(pub String);

impl<'de> Deserialize<'de> for CssValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::String(s) => Ok(CssValue(s)),
            // Numbers are pixels
            Value::Number(n) => Ok(CssValue(format!("{}px", n))),
            _ => Ok(CssValue(String::new())),
        }
    }
}

/// CSS-like properties accepted for the notification class.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassProps {
    pub width: Option<CssValue>,
    pub min_width: Option<CssValue>,
    pub max_width: Option<CssValue>,

    pub margin: Option<CssValue>,
    pub margin_bottom: Option<CssValue>,
    pub padding: Option<CssValue>,
    pub border: Option<CssValue>,

    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub color: Option<String>,
    pub font_size: Option<CssValue>,
}

/// The style every notification is spawned with.
///
/// The equivalent of a single CSS class: one layout, one set of colours and
/// one font size shared by all notifications.
#[derive(Resource, Clone, Debug)]
pub struct NotificationClass {
    pub name: String,
    pub node: Node,
    pub background: Color,
    pub border: Color,
    pub text_color: Color,
    pub font_size: f32,
}

impl Default for NotificationClass {
    fn default() -> Self {
        Self {
            name: "notification".to_string(),
            node: Node {
                padding: UiRect::axes(Val::Px(12.0), Val::Px(8.0)),
                margin: UiRect::bottom(Val::Px(6.0)),
                max_width: Val::Px(360.0),
                ..default()
            },
            background: Color::srgba(0.13, 0.13, 0.13, 0.92),
            border: Color::NONE,
            text_color: Color::WHITE,
            font_size: 16.0,
        }
    }
}

impl NotificationClass {
    /// Build a class from JSON props, starting from the default look.
    ///
    /// ```ignore
    /// let class = NotificationClass::from_json("toast", r##"{"backgroundColor": "#204080", "fontSize": 14}"##)?;
    /// ```
    pub fn from_json(name: impl Into<String>, props_json: &str) -> Result<Self, serde_json::Error> {
        let props: ClassProps = serde_json::from_str(props_json)?;
        let mut class = Self {
            name: name.into(),
            ..Self::default()
        };
        class.apply(&props);
        Ok(class)
    }

    /// Overlay the given props on this class. Unset props keep their value.
    pub fn apply(&mut self, props: &ClassProps) {
        let node = &mut self.node;

        if let Some(ref w) = props.width {
            node.width = parse_val(&w.0);
        }
        if let Some(ref w) = props.min_width {
            node.min_width = parse_val(&w.0);
        }
        if let Some(ref w) = props.max_width {
            node.max_width = parse_val(&w.0);
        }

        if let Some(ref m) = props.margin {
            node.margin = UiRect::all(parse_val(&m.0));
        }
        if let Some(ref m) = props.margin_bottom {
            node.margin.bottom = parse_val(&m.0);
        }
        if let Some(ref p) = props.padding {
            node.padding = UiRect::all(parse_val(&p.0));
        }
        if let Some(ref b) = props.border {
            node.border = UiRect::all(parse_val(&b.0));
        }

        if let Some(color) = props.background_color.as_deref().and_then(parse_color) {
            self.background = color;
        }
        if let Some(color) = props.border_color.as_deref().and_then(parse_color) {
            self.border = color;
        }
        if let Some(color) = props.color.as_deref().and_then(parse_color) {
            self.text_color = color;
        }
        if let Some(ref size) = props.font_size {
            if let Val::Px(px) = parse_val(&size.0) {
                self.font_size = px;
            }
        }
    }
}

/// Convert a CSS-like length to Bevy's Val
/// Supports: "100px", "50%", "auto", "10vw", "10vh", plain numbers as px
pub fn parse_val(value: &str) -> Val {
    let value = value.trim();

    if value == "auto" {
        return Val::Auto;
    }

    let suffixed: [(&str, fn(f32) -> Val); 4] = [
        ("px", Val::Px),
        ("%", Val::Percent),
        ("vw", Val::Vw),
        ("vh", Val::Vh),
    ];
    for (suffix, make) in suffixed {
        if let Some(n) = value.strip_suffix(suffix) {
            if let Ok(n) = n.trim().parse::<f32>() {
                return make(n);
            }
        }
    }

    if let Ok(n) = value.parse::<f32>() {
        return Val::Px(n);
    }

    log::warn!("[Notify] Unknown length '{}', using auto", value);
    Val::Auto
}

/// Parse a CSS colour: a few names, "#rgb[a]", "#rrggbb[aa]", "rgb()", "rgba()".
pub fn parse_color(value: &str) -> Option<Color> {
    let value = value.trim().to_lowercase();

    match value.as_str() {
        "transparent" => return Some(Color::NONE),
        "black" => return Some(Color::BLACK),
        "white" => return Some(Color::WHITE),
        "red" => return Some(Color::srgb(1.0, 0.0, 0.0)),
        "green" => return Some(Color::srgb(0.0, 0.5, 0.0)),
        "blue" => return Some(Color::srgb(0.0, 0.0, 1.0)),
        "orange" => return Some(Color::srgb(1.0, 0.65, 0.0)),
        "gray" | "grey" => return Some(Color::srgb(0.5, 0.5, 0.5)),
        _ => {}
    }

    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    if value.starts_with("rgb") {
        return parse_rgb_color(&value);
    }

    log::warn!("[Notify] Unknown color '{}'", value);
    None
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim();
    if !hex.is_ascii() {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| -> Option<u8> {
        let digits = &hex[range];
        if digits.len() == 1 {
            u8::from_str_radix(&digits.repeat(2), 16).ok()
        } else {
            u8::from_str_radix(digits, 16).ok()
        }
    };

    let (r, g, b, a) = match hex.len() {
        3 => (channel(0..1)?, channel(1..2)?, channel(2..3)?, 255),
        4 => (channel(0..1)?, channel(1..2)?, channel(2..3)?, channel(3..4)?),
        6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?, 255),
        8 => (channel(0..2)?, channel(2..4)?, channel(4..6)?, channel(6..8)?),
        _ => return None,
    };

    Some(Color::srgba_u8(r, g, b, a))
}

fn parse_rgb_color(value: &str) -> Option<Color> {
    let inner = value
        .trim_start_matches("rgba(")
        .trim_start_matches("rgb(")
        .trim_end_matches(')');

    let parts: Vec<&str> = inner.split(',').map(|s| s.trim()).collect();

    let r: f32 = parts.first()?.parse().ok()?;
    let g: f32 = parts.get(1)?.parse().ok()?;
    let b: f32 = parts.get(2)?.parse().ok()?;
    let a: f32 = parts.get(3).and_then(|s| s.parse().ok()).unwrap_or(1.0);

    Some(Color::srgba(r / 255.0, g / 255.0, b / 255.0, a))
}
