use ratatui::style::{palette::tailwind, Color, Modifier, Style};

/// Maps a Tailwind-style token such as `bg-orange-400` or `text-white` to a
/// terminal colour. Unrecognized tokens come back as gray.
pub fn token_color(token: &str) -> Color {
    let name = token
        .strip_prefix("bg-")
        .or_else(|| token.strip_prefix("text-"))
        .unwrap_or(token);
    match name {
        "white" => return Color::White,
        "black" => return Color::Black,
        _ => {}
    }
    let (hue, shade) = name.rsplit_once('-').unwrap_or((name, "500"));
    let Some(palette) = palette(hue) else {
        return tailwind::GRAY.c500;
    };
    match shade {
        "50" => palette.c50,
        "100" => palette.c100,
        "200" => palette.c200,
        "300" => palette.c300,
        "400" => palette.c400,
        "600" => palette.c600,
        "700" => palette.c700,
        "800" => palette.c800,
        "900" => palette.c900,
        "950" => palette.c950,
        _ => palette.c500,
    }
}

fn palette(hue: &str) -> Option<&'static tailwind::Palette> {
    Some(match hue {
        "slate" => &tailwind::SLATE,
        "gray" => &tailwind::GRAY,
        "zinc" => &tailwind::ZINC,
        "neutral" => &tailwind::NEUTRAL,
        "stone" => &tailwind::STONE,
        "red" => &tailwind::RED,
        "orange" => &tailwind::ORANGE,
        "amber" => &tailwind::AMBER,
        "yellow" => &tailwind::YELLOW,
        "lime" => &tailwind::LIME,
        "green" => &tailwind::GREEN,
        "emerald" => &tailwind::EMERALD,
        "teal" => &tailwind::TEAL,
        "cyan" => &tailwind::CYAN,
        "sky" => &tailwind::SKY,
        "blue" => &tailwind::BLUE,
        "indigo" => &tailwind::INDIGO,
        "violet" => &tailwind::VIOLET,
        "purple" => &tailwind::PURPLE,
        "fuchsia" => &tailwind::FUCHSIA,
        "pink" => &tailwind::PINK,
        "rose" => &tailwind::ROSE,
        _ => return None,
    })
}

pub fn muted() -> Style {
    Style::default().fg(tailwind::GRAY.c500)
}

pub fn title() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

pub fn focused_border() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn drop_border() -> Style {
    Style::default()
        .fg(tailwind::BLUE.c300)
        .add_modifier(Modifier::BOLD)
}

pub fn badge(bg: Color, fg: Color) -> Style {
    Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD)
}
