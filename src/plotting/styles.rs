use plotters::style::{RGBAColor, RGBColor};

/// Chart theme configuration
#[derive(Debug, Clone)]
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
    /// Bars and the "created" series
    pub primary_color: RGBColor,
    /// The "closed" series
    pub secondary_color: RGBColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(0, 0, 0, 0.94),
            text_color: RGBAColor(255, 255, 255, 0.8),
            grid_color: RGBAColor(255, 255, 255, 0.15),
            axis_color: RGBAColor(255, 255, 255, 0.8),
            primary_color: RGBColor(135, 206, 250),
            secondary_color: RGBColor(144, 238, 144),
        }
    }
}

impl ChartTheme {
    /// Dark text on white, for reports that get printed.
    pub fn light() -> Self {
        Self {
            background_color: RGBAColor(255, 255, 255, 1.0),
            text_color: RGBAColor(30, 30, 30, 0.9),
            grid_color: RGBAColor(0, 0, 0, 0.1),
            axis_color: RGBAColor(30, 30, 30, 0.9),
            primary_color: RGBColor(70, 130, 180),
            secondary_color: RGBColor(46, 139, 87),
        }
    }
}

/// Chart style configuration
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub line_width: u32,
    pub caption_size: i32,
    pub font_size: i32,
    pub margin: i32,
    pub label_area_size: i32,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            line_width: 2,
            caption_size: 26,
            font_size: 15,
            margin: 10,
            label_area_size: 50,
        }
    }
}
