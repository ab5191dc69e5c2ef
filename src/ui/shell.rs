// ============================================================================
// Shell - Rendu de l'interface principale
// ============================================================================
// Dessine le cadre commun à toutes les pages :
// - Header : titre + liens de navigation
// - Contenu : page d'accueil OU page "Make Pick" selon la route
// - Footer : raccourcis, paris en vol, quota API, confirmation de quit
// - Notifications : pile en haut à droite, par-dessus le reste
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Layout : découpage de l'espace en zones
// 3. Clear : efface une zone avant de dessiner un overlay
// ============================================================================

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Route};
use crate::notify::NotificationKind;
use crate::ui::pick_page::render_pick_page;

/// Largeur maximale d'une notification
const TOAST_WIDTH: u16 = 48;

/// Lignes fixes d'une notification : deux bordures + la jauge de durée
const TOAST_CHROME: u16 = 3;

/// Dessine l'interface complète
///
/// CONCEPT RUST : Routing avec match sur enum
/// - Le compilateur garantit que chaque route a un rendu
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, app.route, chunks[0]);

    match (app.route, app.pick_page.as_ref()) {
        (Route::MakePick, Some(page)) => render_pick_page(frame, page, app.timezone, chunks[1]),
        _ => render_welcome(frame, chunks[1]),
    }

    if app.is_in_input_mode() {
        render_input_footer(frame, app, chunks[2]);
    } else {
        render_footer(frame, app, chunks[2]);
    }

    render_notifications(frame, app, Instant::now());
}

/// Crée le layout principal (header, content, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Contenu
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header : titre + navigation
// ============================================================================

/// Dessine le header avec les deux liens, le lien actif en surbrillance
fn render_header(frame: &mut Frame, active: Route, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Top Ledger ")
        .title_alignment(Alignment::Center);

    let link = |key: &'static str, route: Route| -> Vec<Span<'static>> {
        let style = if route == active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        vec![
            Span::styled(key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(format!(" {} ", route.label()), style),
            Span::raw("   "),
        ]
    };

    let mut spans = link("[1]", Route::Home);
    spans.extend(link("[2]", Route::MakePick));

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Page d'accueil
// ============================================================================

fn render_welcome(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Welcome to Top Ledger",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Your sports betting ledger application",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Press "),
            Span::styled("[Enter]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" to make a pick"),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Footer : Instructions
// ============================================================================

/// Dessine le footer avec les raccourcis clavier
///
/// CONCEPT : Confirmation de quit two-step
/// - En attente de confirmation : message d'avertissement clignotant
/// - Sinon : raccourcis de la page + état (paris en vol, quota)
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let key = |label: &'static str| {
        Span::styled(label, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    };

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Press ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " again to quit, or any other key to cancel ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else {
        let mut spans = vec![key("[q]"), Span::raw(" Quit  "), key("[g]"), Span::raw(" Go to  ")];

        match &app.pick_page {
            Some(page) if app.is_on_pick_page() => {
                spans.extend([
                    key("[← →]"),
                    Span::raw(" Sport  "),
                    key("[↑↓]"),
                    Span::raw(" Game  "),
                    key("[Tab]"),
                    Span::raw(" Side  "),
                    key("[Enter]"),
                    Span::raw(" Pick  "),
                ]);
                if let Some(info) = page.api_info() {
                    spans.push(Span::styled(
                        format!("Quota: {} left / {} used  ", info.remaining(), info.used()),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            _ => spans.extend([key("[Enter]"), Span::raw(" Make Pick  ")]),
        }

        let pending = app.pending_pick_count();
        if pending > 0 {
            spans.push(Span::styled(
                format!("⏳ {} pick(s) in flight", pending),
                Style::default().fg(Color::Magenta),
            ));
        }

        Line::from(spans)
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Dessine le footer en mode input avec la ligne de saisie
fn render_input_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green))
        .title(" [Enter] Confirm  [ESC] Cancel ");

    let input_line = Line::from(vec![
        Span::styled(
            app.input_prompt.as_str(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled(app.input_buffer.as_str(), Style::default().fg(Color::White)),
        Span::styled(
            "█", // Curseur
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ),
    ]);

    let paragraph = Paragraph::new(input_line)
        .block(block)
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Notifications : overlay en haut à droite
// ============================================================================

/// Empile les notifications visibles, la plus récente en haut
///
/// La hauteur de chaque notification suit la longueur de son message :
/// une erreur réseau reste lisible en entier
fn render_notifications(frame: &mut Frame, app: &App, now: Instant) {
    if app.notifications.is_empty() {
        return;
    }

    let screen = frame.size();
    let width = TOAST_WIDTH.min(screen.width);
    let inner_width = width.saturating_sub(2).max(1);
    let bottom = screen.y + screen.height;
    let mut y = screen.y + 1;

    for notification in app.notifications.visible(now) {
        let wanted = wrapped_line_count(&notification.message, inner_width) + TOAST_CHROME;
        let height = wanted.min(bottom.saturating_sub(y));
        if height < TOAST_CHROME {
            break;
        }

        let area = Rect::new(screen.x + screen.width - width, y, width, height);
        y += height;

        let (color, title) = match notification.kind {
            NotificationKind::Success => (Color::Green, " ✔ Success "),
            NotificationKind::Error => (Color::Red, " ✖ Error "),
        };

        // Jauge : se vide à mesure que le TTL s'écoule
        let remaining = (notification.progress(now) * f32::from(inner_width)).round() as usize;

        let text = vec![
            Line::from(Span::styled(notification.message.as_str(), Style::default().fg(color))),
            Line::from(Span::styled("━".repeat(remaining), Style::default().fg(Color::DarkGray))),
        ];

        let paragraph = Paragraph::new(text).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        );

        frame.render_widget(Clear, area);
        frame.render_widget(paragraph, area);
    }
}

/// Nombre de lignes d'un texte replié mot à mot sur `width` colonnes
///
/// Même règle que Wrap : coupure aux espaces, un mot trop long est coupé
fn wrapped_line_count(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let mut lines = 1;
    let mut current = 0;

    for word in text.split_whitespace() {
        let len = word.chars().count();
        if current > 0 && current + 1 + len <= width {
            current += 1 + len;
            continue;
        }
        if current > 0 {
            lines += 1;
        }
        lines += (len - 1) / width;
        current = (len - 1) % width + 1;
    }

    u16::try_from(lines).unwrap_or(u16::MAX)
}

// ============================================================================
// Tests
// ============================================================================
