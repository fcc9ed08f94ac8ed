use tui::{
    backend::Backend,
    layout::Alignment,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::centered_rect;

/// Full-screen loading indicator, shown instead of the page content
/// while a fetch is in flight.
pub fn render_loading<B: Backend>(frame: &mut Frame<B>, message: &str) {
    let area = centered_rect(40, 20, frame.size());

    let spinner = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(spinner, area);
}
