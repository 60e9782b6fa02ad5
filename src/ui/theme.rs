use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone)]
pub struct Theme {
    // Overall background color to paint the full frame
    pub background_color: Color,

    // Transcript
    pub user_prefix_style: Style,
    pub user_text_style: Style,
    pub bot_prefix_style: Style,
    pub bot_text_style: Style,
    pub offensive_text_style: Style,
    pub irrelevant_text_style: Style,
    pub welcome_style: Style,
    pub typing_indicator_style: Style,

    // Chrome
    pub title_style: Style,
    pub status_style: Style,
    pub status_error_style: Style,
    pub input_border_style: Style,
    pub input_title_style: Style,
    pub input_text_style: Style,
    pub counter_style: Style,
}

impl Theme {
    pub fn dark_default() -> Self {
        Theme {
            background_color: Color::Black,
            user_prefix_style: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Cyan),
            bot_prefix_style: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            bot_text_style: Style::default().fg(Color::White),
            offensive_text_style: Style::default().fg(Color::LightRed),
            irrelevant_text_style: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
            welcome_style: Style::default().fg(Color::DarkGray),
            typing_indicator_style: Style::default().fg(Color::Gray),

            title_style: Style::default().fg(Color::Gray),
            status_style: Style::default().fg(Color::Green),
            status_error_style: Style::default().fg(Color::LightRed),
            input_border_style: Style::default().fg(Color::Gray),
            input_title_style: Style::default().fg(Color::Gray),
            input_text_style: Style::default().fg(Color::White),
            counter_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn light() -> Self {
        Theme {
            background_color: Color::White,
            user_prefix_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            user_text_style: Style::default().fg(Color::Blue),
            bot_prefix_style: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            bot_text_style: Style::default().fg(Color::Black),
            offensive_text_style: Style::default().fg(Color::Red),
            irrelevant_text_style: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::ITALIC),
            welcome_style: Style::default().fg(Color::Gray),
            typing_indicator_style: Style::default().fg(Color::DarkGray),

            title_style: Style::default().fg(Color::DarkGray),
            status_style: Style::default().fg(Color::Green),
            status_error_style: Style::default().fg(Color::Red),
            input_border_style: Style::default().fg(Color::Black),
            input_title_style: Style::default().fg(Color::DarkGray),
            input_text_style: Style::default().fg(Color::Black),
            counter_style: Style::default().fg(Color::Magenta),
        }
    }

    /// No colors at all; flagged messages are distinguished by modifiers.
    pub fn monochrome() -> Self {
        let plain = Style::default();
        Theme {
            background_color: Color::Reset,
            user_prefix_style: plain.add_modifier(Modifier::BOLD),
            user_text_style: plain,
            bot_prefix_style: plain.add_modifier(Modifier::BOLD),
            bot_text_style: plain,
            offensive_text_style: plain.add_modifier(Modifier::REVERSED),
            irrelevant_text_style: plain.add_modifier(Modifier::ITALIC),
            welcome_style: plain.add_modifier(Modifier::DIM),
            typing_indicator_style: plain.add_modifier(Modifier::DIM),

            title_style: plain,
            status_style: plain,
            status_error_style: plain.add_modifier(Modifier::BOLD),
            input_border_style: plain,
            input_title_style: plain,
            input_text_style: plain,
            counter_style: plain.add_modifier(Modifier::BOLD),
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(Self::dark_default()),
            "light" => Some(Self::light()),
            "monochrome" | "mono" => Some(Self::monochrome()),
            _ => None,
        }
    }
}
