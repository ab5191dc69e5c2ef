// ============================================================================
// Page "Make Pick" - Rendu
// ============================================================================
// Dessine le sélecteur de sport puis UNE des sections suivantes :
// - Loading : indicateur nommant le sport (rien d'autre)
// - Error : message + contrôle de retry
// - Games : une carte par match
// - Empty : message "no games" nommant le sport
//
// CONCEPTS RATATUI :
// 1. List + ListState : la carte en surbrillance reste visible (scroll)
// 2. Text multi-lignes : une carte = plusieurs Lines dans un ListItem
// ============================================================================

use chrono_tz::Tz;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::{format_game_time, format_odds, Game, Side, Sport};
use crate::pick_page::{PickPage, PickView};

/// Dessine la page dans la zone de contenu
pub fn render_pick_page(frame: &mut Frame, page: &PickPage, timezone: Tz, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Sélecteur de sport
            Constraint::Min(0),    // Section principale
        ])
        .split(area);

    render_sport_selector(frame, page.selected_sport(), chunks[0]);

    // Priorité fixe : Loading > Error > Games > Empty
    match page.view() {
        PickView::Loading { sport } => render_loading(frame, sport, chunks[1]),
        PickView::Error { message } => render_error(frame, message, chunks[1]),
        PickView::Games { sport, games } => render_games(
            frame,
            sport,
            games,
            page.selected_game_index(),
            page.selected_side(),
            timezone,
            chunks[1],
        ),
        PickView::Empty { sport } => render_empty(frame, sport, chunks[1]),
    }
}

/// Sélecteur de sport : toujours affiché, le sport courant en surbrillance
fn render_sport_selector(frame: &mut Frame, selected: Sport, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Select Sport ");

    let mut spans = vec![Span::styled(
        "[← →] ",
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )];

    for sport in Sport::all() {
        let label = format!(" {} {} ", sport.icon(), sport.name());
        let style = if sport == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_loading(frame: &mut Frame, sport: Sport, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Loading odds for {}...", sport.name()),
            Style::default().fg(Color::Yellow),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn render_error(frame: &mut Frame, message: &str, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("Error: {}", message),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "[r] Retry",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

fn render_empty(frame: &mut Frame, sport: Sport, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("No upcoming games available for {} at the moment.", sport.name()),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            "Check back later or try a different sport.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Liste des cartes de match
///
/// CONCEPT RATATUI : render_stateful_widget
/// - ListState porte la sélection, List calcule le scroll
fn render_games(
    frame: &mut Frame,
    sport: Sport,
    games: &[Game],
    selected_game: usize,
    selected_side: Side,
    timezone: Tz,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Upcoming Games - {} ", sport.name()));

    let items: Vec<ListItem> = games
        .iter()
        .enumerate()
        .map(|(index, game)| {
            let highlighted = (index == selected_game).then_some(selected_side);
            ListItem::new(game_card(game, highlighted, timezone))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("▶ ")
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));

    let mut state = ListState::default().with_selected(Some(selected_game));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Construit une carte de match
///
/// `highlighted` : côté en surbrillance si la carte est sélectionnée
fn game_card(game: &Game, highlighted: Option<Side>, timezone: Tz) -> Text<'static> {
    let mut lines = vec![
        Line::from(Span::styled(
            game.matchup(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format_game_time(&game.commence_time, timezone),
                Style::default().fg(Color::Gray),
            ),
            Span::raw("  "),
            Span::styled(format!("via {}", game.bookmaker), Style::default().fg(Color::DarkGray)),
        ]),
    ];

    for side in [Side::Home, Side::Away] {
        lines.push(team_line(game, side, highlighted == Some(side)));
    }

    for (label, market) in [("Spread", "spreads"), ("Total", "totals")] {
        if let Some(description) = game.describe_market(market) {
            lines.push(Line::from(vec![
                Span::styled(format!("  {}: ", label), Style::default().fg(Color::DarkGray)),
                Span::styled(description, Style::default().fg(Color::Gray)),
            ]));
        }
    }

    lines.push(Line::from(""));
    Text::from(lines)
}

/// Une ligne par équipe : nom, cote, bouton "Pick {team}"
fn team_line(game: &Game, side: Side, highlighted: bool) -> Line<'static> {
    let odds = game.odds(side);
    let odds_style = match odds {
        Some(value) if value > 0 => Style::default().fg(Color::Green),
        Some(_) => Style::default().fg(Color::Red),
        None => Style::default().fg(Color::DarkGray),
    };

    let button_style = if highlighted {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    };

    Line::from(vec![
        Span::raw(format!("  {:<28}", game.team(side))),
        Span::styled(format!("{:>6}", format_odds(odds)), odds_style),
        Span::raw("   "),
        Span::styled(format!("[ Pick {} ]", game.team(side)), button_style),
    ])
}
