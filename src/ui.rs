//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).  Rendering only reads the latest
//! [`ViewState`](crate::state::ViewState) the app pulled from the controller;
//! it never talks to the network.
//!
//! ## For contributors
//!
//! * The layout is a three-row split: a user bar on top, the main view in the
//!   middle, and a one-line status bar at the bottom.
//! * The main view is exactly one of error, loading, or user detail, chosen
//!   by [`ViewState::display`](crate::state::ViewState::display).  Keep that
//!   priority (error, then loading, then content) if you add views.
//! * [`ratatui`] is the TUI framework; see its docs for widget details.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::App;
use crate::model::User;
use crate::state::View;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [users_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_user_bar(app, frame, users_area);
    draw_main(app, frame, main_area);
    draw_status_bar(app, frame, status_area);
}

fn draw_user_bar(app: &App, frame: &mut Frame, area: Rect) {
    let titles: Vec<Line> = app
        .users
        .iter()
        .map(|user| Line::from(user.name.as_str()))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.selected_user)
        .block(Block::default().title(" Users ").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_main(app: &mut App, frame: &mut Frame, area: Rect) {
    match app.view.display() {
        View::Error(msg) => {
            let text = Text::from(vec![
                Line::styled(
                    "Error",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Line::styled(msg.to_string(), Style::default().fg(Color::DarkGray)),
            ]);
            let error = Paragraph::new(text)
                .block(Block::default().borders(Borders::ALL))
                .wrap(Wrap { trim: true });
            frame.render_widget(error, area);
        }
        View::Loading => {
            let loading = Paragraph::new("Loading..")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(loading, area);
        }
        View::Content(_) => match app.current_user().cloned() {
            Some(user) => draw_user_detail(app, &user, frame, area),
            None => {
                let idle = Paragraph::new("No user selected")
                    .block(Block::default().borders(Borders::ALL));
                frame.render_widget(idle, area);
            }
        },
    }
}

/// The user's name and email followed by their posts, keyed by post id.
fn draw_user_detail(app: &mut App, user: &User, frame: &mut Frame, area: Rect) {
    let [header_area, posts_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(area);

    let header = Paragraph::new(vec![
        Line::styled(
            user.name.as_str(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Line::styled(user.email.as_str(), Style::default().fg(Color::Cyan)),
    ]);
    frame.render_widget(header, header_area);

    let items: Vec<ListItem> = app
        .view
        .posts
        .iter()
        .map(|post| {
            ListItem::new(Text::from(vec![
                Line::from(vec![
                    Span::styled(
                        format!("#{:<4}", post.id),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        post.title.as_str(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::raw(format!("      {}", post.body.replace('\n', " "))),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(format!(" Posts ({}) ", app.view.posts.len()))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, posts_area, &mut app.list_state);
}

/// Render the one-line status bar with the latest transition and key help.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::raw(" "),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  q: quit  Tab/←/→: user  ↑/↓: scroll  Home/End: jump"),
    ]));
    frame.render_widget(status, area);
}
