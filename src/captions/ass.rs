/*!
 * Styled event-based subtitle output (Advanced SubStation Alpha).
 */

use std::fmt;
use serde::{Deserialize, Serialize};

// @const: Column layout of the style line
const STYLE_FORMAT: &str = "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding";

// @const: Column layout of dialogue events
const EVENT_FORMAT: &str = "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text";

/// Format seconds as `H:MM:SS.cc`; hours unpadded, seconds always five characters
pub fn format_ass_timestamp(seconds: f64) -> String {
    let total_cs = (seconds.max(0.0) * 100.0).round() as u64;
    let cs = total_cs % 100;
    let total_secs = total_cs / 100;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;
    format!("{hours}:{mins:02}:{secs:02}.{cs:02}")
}

/// The single named style every caption uses
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CaptionStyle {
    #[serde(default = "default_style_name")]
    pub name: String,

    #[serde(default = "default_font_name")]
    pub font_name: String,

    #[serde(default = "default_font_size")]
    pub font_size: u32,

    /// Colours in `&HAABBGGRR` form
    #[serde(default = "default_primary_colour")]
    pub primary_colour: String,

    #[serde(default = "default_secondary_colour")]
    pub secondary_colour: String,

    #[serde(default = "default_outline_colour")]
    pub outline_colour: String,

    #[serde(default = "default_back_colour")]
    pub back_colour: String,

    #[serde(default = "default_true")]
    pub bold: bool,

    #[serde(default)]
    pub italic: bool,

    /// 1 = outline and drop shadow, 3 = opaque box
    #[serde(default = "default_border_style")]
    pub border_style: u8,

    #[serde(default = "default_outline")]
    pub outline: u32,

    #[serde(default)]
    pub shadow: u32,

    /// Numpad position, 2 = bottom centre
    #[serde(default = "default_alignment")]
    pub alignment: u8,

    #[serde(default = "default_margin_h")]
    pub margin_l: u32,

    #[serde(default = "default_margin_h")]
    pub margin_r: u32,

    #[serde(default = "default_margin_v")]
    pub margin_v: u32,

    #[serde(default = "default_play_res_x")]
    pub play_res_x: u32,

    #[serde(default = "default_play_res_y")]
    pub play_res_y: u32,

    #[serde(default = "default_fade_ms")]
    pub fade_in_ms: u32,

    #[serde(default = "default_fade_ms")]
    pub fade_out_ms: u32,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            name: default_style_name(),
            font_name: default_font_name(),
            font_size: default_font_size(),
            primary_colour: default_primary_colour(),
            secondary_colour: default_secondary_colour(),
            outline_colour: default_outline_colour(),
            back_colour: default_back_colour(),
            bold: true,
            italic: false,
            border_style: default_border_style(),
            outline: default_outline(),
            shadow: 0,
            alignment: default_alignment(),
            margin_l: default_margin_h(),
            margin_r: default_margin_h(),
            margin_v: default_margin_v(),
            play_res_x: default_play_res_x(),
            play_res_y: default_play_res_y(),
            fade_in_ms: default_fade_ms(),
            fade_out_ms: default_fade_ms(),
        }
    }
}

impl CaptionStyle {
    /// Override tag prepended to every event's text
    pub fn fade_tag(&self) -> String {
        format!("{{\\fad({},{})}}", self.fade_in_ms, self.fade_out_ms)
    }

    /// The `Style:` line for this style
    pub fn style_line(&self) -> String {
        // ASS booleans are -1 / 0
        let flag = |on: bool| if on { -1 } else { 0 };
        format!(
            "Style: {},{},{},{},{},{},{},{},{},0,0,100,100,0,0,{},{},{},{},{},{},{},1",
            self.name,
            self.font_name,
            self.font_size,
            self.primary_colour,
            self.secondary_colour,
            self.outline_colour,
            self.back_colour,
            flag(self.bold),
            flag(self.italic),
            self.border_style,
            self.outline,
            self.shadow,
            self.alignment,
            self.margin_l,
            self.margin_r,
            self.margin_v,
        )
    }

    /// Script info, style and event format sections
    pub fn header(&self) -> String {
        format!(
            "[Script Info]\n\
             ScriptType: v4.00+\n\
             PlayResX: {}\n\
             PlayResY: {}\n\
             WrapStyle: 0\n\
             ScaledBorderAndShadow: yes\n\
             \n\
             [V4+ Styles]\n\
             {}\n\
             {}\n\
             \n\
             [Events]\n\
             {}\n",
            self.play_res_x,
            self.play_res_y,
            STYLE_FORMAT,
            self.style_line(),
            EVENT_FORMAT,
        )
    }
}

fn default_style_name() -> String {
    "Default".to_string()
}

fn default_font_name() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    72
}

fn default_primary_colour() -> String {
    "&H00FFFFFF".to_string()
}

fn default_secondary_colour() -> String {
    "&H000000FF".to_string()
}

fn default_outline_colour() -> String {
    "&H00000000".to_string()
}

fn default_back_colour() -> String {
    "&H64000000".to_string()
}

fn default_true() -> bool {
    true
}

fn default_border_style() -> u8 {
    1
}

fn default_outline() -> u32 {
    4
}

fn default_alignment() -> u8 {
    2
}

fn default_margin_h() -> u32 {
    40
}

fn default_margin_v() -> u32 {
    300
}

fn default_play_res_x() -> u32 {
    1080
}

fn default_play_res_y() -> u32 {
    1920
}

fn default_fade_ms() -> u32 {
    200
}

// @struct: One timed caption entry
#[derive(Debug, Clone, PartialEq)]
pub struct DialogueEvent {
    // @field: Start in seconds
    pub start: f64,

    // @field: End in seconds
    pub end: f64,

    // @field: Style name
    pub style: String,

    // @field: Override tags followed by caption words
    pub text: String,
}

impl fmt::Display for DialogueEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Dialogue: 0,{},{},{},,0,0,0,,{}",
            format_ass_timestamp(self.start),
            format_ass_timestamp(self.end),
            self.style,
            self.text
        )
    }
}

/// Style header plus ordered dialogue events
#[derive(Debug, Clone, PartialEq)]
pub struct StyledSubtitleDocument {
    pub style: CaptionStyle,
    pub events: Vec<DialogueEvent>,
}

impl StyledSubtitleDocument {
    pub fn new(style: CaptionStyle) -> Self {
        StyledSubtitleDocument {
            style,
            events: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn to_ass_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StyledSubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.style.header())?;
        for event in &self.events {
            writeln!(f, "{}", event)?;
        }
        Ok(())
    }
}
