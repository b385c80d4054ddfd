use anyhow::Result;
use chrono_tz::Tz;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ledgerlens_core::Severity;
use ledgerlens_ingest::StatementSource;
use ratatui::{
    Frame, Terminal,
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io;

use crate::page::AccountPage;
use crate::render::{EMPTY_MESSAGE, LOADING_MESSAGE, TransactionRow, account_lines, transaction_rows};

pub async fn run_tui<S: StatementSource>(source: &S, tz: Tz) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = page_loop(&mut terminal, source, tz).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn page_loop<B: Backend, S: StatementSource>(
    terminal: &mut Terminal<B>,
    source: &S,
    tz: Tz,
) -> Result<()> {
    let mut page = AccountPage::new();
    reload(terminal, &mut page, source, tz).await?;

    loop {
        let rows = transaction_rows(&page.transactions, tz);
        terminal.draw(|f| draw_page(f, &page, &rows))?;

        if event::poll(std::time::Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('r') => reload(terminal, &mut page, source, tz).await?,
                    _ => {}
                }
            }
        }
    }

    Ok(())
}

/// Show the loading state, then wait for exactly one fetch.
async fn reload<B: Backend, S: StatementSource>(
    terminal: &mut Terminal<B>,
    page: &mut AccountPage,
    source: &S,
    tz: Tz,
) -> Result<()> {
    page.begin_load();
    let rows = transaction_rows(&page.transactions, tz);
    terminal.draw(|f| draw_page(f, page, &rows))?;

    let res = source.fetch().await;
    page.finish_load(res);
    Ok(())
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => Color::Green,
        Severity::Danger => Color::Red,
    }
}

pub fn draw_page(f: &mut Frame, page: &AccountPage, rows: &[TransactionRow]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let header_lines: Vec<Line> = if page.is_loading && page.account.is_none() {
        vec![Line::from(Span::styled(
            LOADING_MESSAGE,
            Style::default().fg(Color::Gray),
        ))]
    } else {
        account_lines(page)
            .into_iter()
            .enumerate()
            .map(|(i, l)| {
                if i == 0 {
                    Line::from(Span::styled(
                        l,
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::raw(l)
                }
            })
            .collect()
    };
    let header = Paragraph::new(Text::from(header_lines))
        .block(Block::default().borders(Borders::ALL).title("account"));
    f.render_widget(header, chunks[0]);

    let mut lines: Vec<Line> = Vec::new();
    if page.is_loading {
        lines.push(Line::from(Span::styled(
            LOADING_MESSAGE,
            Style::default().fg(Color::Gray),
        )));
    } else if let Some(err) = &page.error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
    } else if page.account.is_some() && rows.is_empty() {
        lines.push(Line::raw(EMPTY_MESSAGE));
    } else {
        for row in rows {
            let color = severity_color(row.severity);
            lines.push(Line::from(vec![
                Span::styled(format!("{:<4}", row.tag()), Style::default().fg(color)),
                Span::styled(
                    format!("{:<24} ", row.counterparty),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{:<28} ", row.description)),
                Span::styled(
                    format!("{:<24} ", row.date),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(format!("{:>14}", row.amount), Style::default().fg(color)),
            ]));
        }
    }

    let list = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("transactions"))
        .wrap(Wrap { trim: false });
    f.render_widget(list, chunks[1]);

    let footer = Paragraph::new(Line::from(Span::styled(
        "r=reload  q=quit",
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerlens_core::{Account, BankStatement, Transaction};
    use ratatui::backend::TestBackend;

    fn screen_text(page: &AccountPage) -> String {
        let rows = transaction_rows(&page.transactions, Tz::UTC);
        let mut terminal = Terminal::new(TestBackend::new(110, 15)).unwrap();
        terminal.draw(|f| draw_page(f, page, &rows)).unwrap();

        let buf = terminal.backend().buffer().clone();
        let mut out = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_draw_loaded_page() {
        let mut page = AccountPage::new();
        page.finish_load(Ok(BankStatement {
            account: Account {
                name: "Jane Doe".to_string(),
                iban: "NL91ABNA0417164300".to_string(),
                balance: Some(1520.4),
            },
            currency: "EUR".to_string(),
            transactions: vec![Transaction {
                description: "Rent".to_string(),
                amount: Some(950.0),
                date: Some("2024-01-01T08:00:00Z".to_string()),
                to: Some("Landlord".to_string()),
                ..Default::default()
            }],
        }));

        let text = screen_text(&page);
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("Balance: 1,520.40 EUR"));
        assert!(text.contains("In: +€0.00  Out: -€950.00"));
        assert!(text.contains("Landlord"));
        assert!(text.contains("-€950.00"));
        assert!(text.contains("Jan 1, 2024, 08:00 AM"));
    }

    #[test]
    fn test_draw_loading_and_error() {
        let mut page = AccountPage::new();
        page.begin_load();
        assert!(screen_text(&page).contains(LOADING_MESSAGE));

        page.finish_load(Err(ledgerlens_ingest::FetchError::Status(404)));
        assert!(screen_text(&page).contains(crate::page::LOAD_FAILED_MESSAGE));
    }
}
