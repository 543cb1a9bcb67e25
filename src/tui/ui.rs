//! UI rendering for the TUI.
//!
//! One draw function per wizard step, sharing a header with the step
//! progress and a status bar with key hints.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
    Frame,
};

use crate::app::ImageStatus;
use crate::core::{Text, WizardStep, WorkoutPlan};
use crate::App;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Draw the main UI.
pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with progress
            Constraint::Min(6),    // Step content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);

    match app.wizard.step() {
        WizardStep::Intro => draw_intro(frame, app, chunks[1]),
        WizardStep::SelectLevel | WizardStep::SelectGoal | WizardStep::SelectMuscle => {
            draw_selection(frame, app, chunks[1]);
        }
        WizardStep::Loading => draw_loading(frame, app, chunks[1]),
        WizardStep::Result => draw_result(frame, app, chunks[1]),
        WizardStep::Error => draw_error(frame, app, chunks[1]),
    }

    draw_status_bar(frame, app, chunks[2]);
}

/// Draw the header: app name and, on selection screens, the step progress.
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.frame())
        .title(Span::styled(format!(" {} ", app.text(Text::AppName)), theme.title()));

    let Some(index) = app.wizard.step().selection_index() else {
        let tagline = Paragraph::new(Span::styled(app.text(Text::Tagline), theme.dim()))
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(tagline, area);
        return;
    };

    let total = WizardStep::SELECTION_STEPS;
    let gauge = Gauge::default()
        .block(block)
        .gauge_style(theme.title())
        .ratio(index.min(total) as f64 / total as f64)
        .label(format!("{index}/{total}"));
    frame.render_widget(gauge, area);
}

fn draw_intro(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(app.text(Text::AppName), theme.title())),
        Line::from(""),
        Line::from(Span::styled(app.text(Text::Tagline), theme.body())),
        Line::from(""),
        Line::from(Span::styled(app.text(Text::Start), theme.heading())),
    ];

    let intro = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::vertical(area.height / 4)));
    frame.render_widget(intro, area);
}

/// Draw one of the three selection screens.
fn draw_selection(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let step = app.wizard.step();
    let question = match step {
        WizardStep::SelectLevel => Text::AskLevel,
        WizardStep::SelectGoal => Text::AskGoal,
        _ => Text::AskMuscle,
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3), Constraint::Length(2)])
        .split(area);

    let heading = Paragraph::new(Span::styled(app.text(question), theme.heading()))
        .block(Block::default().padding(Padding::horizontal(2)));
    frame.render_widget(heading, chunks[0]);

    let chosen = app.selected_option();
    let items: Vec<ListItem> = app
        .options()
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            let (marker, style) = if chosen == Some(i) {
                ("●", theme.heading())
            } else {
                ("○", theme.body())
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {marker} "), style),
                Span::styled(label, style),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).border_style(theme.frame()))
        .highlight_style(theme.highlighted())
        .highlight_symbol("▶");
    let mut state = ListState::default().with_selected(Some(app.cursor));
    frame.render_stateful_widget(list, chunks[1], &mut state);

    // The continue action is dimmed until something is chosen
    let action = if step == WizardStep::SelectMuscle { Text::Generate } else { Text::Next };
    let action_style = if app.wizard.can_advance() { theme.title() } else { theme.hint() };
    let mut footer = vec![Span::styled(format!("  → {}", app.text(action)), action_style)];
    if let Some(message) = &app.status_message {
        footer.push(Span::styled(format!("   {message}"), theme.hint()));
    }
    frame.render_widget(Paragraph::new(Line::from(footer)), chunks[2]);
}

fn draw_loading(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let spinner = SPINNER[app.spinner_frame % SPINNER.len()];
    let lines = vec![
        Line::from(Span::styled(format!("{spinner} {}", app.text(Text::Loading)), theme.title())),
        Line::from(""),
        Line::from(Span::styled(app.text(Text::LoadingDetail), theme.dim())),
    ];

    let loading = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().padding(Padding::vertical(area.height / 3)));
    frame.render_widget(loading, area);
}

fn draw_error(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let message = app.wizard.error().unwrap_or_else(|| app.locale().retry_message());
    let lines = vec![
        Line::from(Span::styled(app.text(Text::ErrorTitle), theme.heading().fg(theme.error))),
        Line::from(""),
        Line::from(Span::styled(message, theme.body())),
        Line::from(""),
        Line::from(Span::styled(format!("[r] {}", app.text(Text::TryAgain)), theme.title())),
    ];

    let error = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.frame().fg(theme.error))
                .padding(Padding::vertical(area.height / 4)),
        );
    frame.render_widget(error, area);
}

/// Draw the generated plan: summary, warm-up and cool-down side by side,
/// then the exercise list.
fn draw_result(frame: &mut Frame, app: &App, area: Rect) {
    let Some(plan) = app.wizard.plan() else {
        return;
    };
    let theme = &app.theme;

    let routine_rows = plan.warmup.len().max(plan.cooldown.len()) as u16 + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(routine_rows.min(8)),
            Constraint::Min(4),
        ])
        .split(area);

    draw_plan_summary(frame, app, plan, chunks[0]);

    let routines = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    draw_routine(frame, app, app.text(Text::Warmup), &plan.warmup, routines[0]);
    draw_routine(frame, app, app.text(Text::Cooldown), &plan.cooldown, routines[1]);

    let mut lines = Vec::new();
    for (i, exercise) in plan.exercises.iter().enumerate() {
        let status = app.images.get(i).copied().unwrap_or(ImageStatus::Skipped);
        let mut title = vec![Span::styled(format!("{}. {}", i + 1, exercise.name), theme.heading())];
        if let Some(badge) = image_badge(app, status) {
            title.push(badge);
        }
        lines.push(Line::from(title));
        lines.push(Line::from(vec![
            Span::styled(format!("   {}: ", app.text(Text::Sets)), theme.dim()),
            Span::styled(exercise.sets.as_str(), theme.body()),
            Span::styled(format!("   {}: ", app.text(Text::Reps)), theme.dim()),
            Span::styled(exercise.reps.as_str(), theme.body()),
            Span::styled(format!("   {}: ", app.text(Text::Rest)), theme.dim()),
            Span::styled(exercise.rest.as_str(), theme.body()),
        ]));
        lines.push(Line::from(Span::styled(format!("   {}", exercise.notes), theme.dim())));
        lines.push(Line::from(""));
    }

    let exercises = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.frame())
                .title(Span::styled(format!(" {} ", app.text(Text::MainWorkout)), theme.title())),
        );
    frame.render_widget(exercises, chunks[2]);
}

fn draw_plan_summary(frame: &mut Frame, app: &App, plan: &WorkoutPlan, area: Rect) {
    let theme = &app.theme;
    let lines = vec![
        Line::from(Span::styled(plan.title.as_str(), theme.title())),
        Line::from(Span::styled(plan.description.as_str(), theme.body())),
        Line::from(vec![
            Span::styled(format!("⏱ {}", plan.estimated_duration), theme.dim()),
            Span::styled("  │  ", theme.frame()),
            Span::styled(format!("📅 {}", plan.frequency_recommendation), theme.dim()),
        ]),
    ];
    let summary = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::horizontal(1)));
    frame.render_widget(summary, area);
}

fn draw_routine(frame: &mut Frame, app: &App, title: &str, items: &[String], area: Rect) {
    let theme = &app.theme;
    let items: Vec<ListItem> = items
        .iter()
        .map(|item| ListItem::new(Span::styled(format!("• {item}"), theme.body())))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.frame())
            .title(Span::styled(format!(" {title} "), theme.heading())),
    );
    frame.render_widget(list, area);
}

fn image_badge(app: &App, status: ImageStatus) -> Option<Span<'static>> {
    let theme = &app.theme;
    let (text, color) = match status {
        ImageStatus::Pending => (format!("  {}", app.text(Text::ImagePending)), theme.warning),
        ImageStatus::Ready(bytes) => {
            (format!("  {} ({})", app.text(Text::ImageReady), format_size(bytes)), theme.success)
        }
        ImageStatus::Unavailable => {
            (format!("  {}", app.text(Text::ImageUnavailable)), theme.text_muted)
        }
        ImageStatus::Skipped => return None,
    };
    Some(Span::styled(text, theme.hint().fg(color)))
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let hints = match app.wizard.step() {
        WizardStep::Intro => format!("Enter start • q {}", app.text(Text::Quit)),
        WizardStep::SelectLevel | WizardStep::SelectGoal | WizardStep::SelectMuscle => format!(
            "↑↓ • Space • Enter {} • Esc {} • q {}",
            app.text(Text::Next),
            app.text(Text::Back),
            app.text(Text::Quit)
        ),
        WizardStep::Loading => format!("q {}", app.text(Text::Quit)),
        WizardStep::Result => format!(
            "↑↓ scroll • n {} • q {}",
            app.text(Text::NewPlan),
            app.text(Text::Quit)
        ),
        WizardStep::Error => format!("r {} • q {}", app.text(Text::TryAgain), app.text(Text::Quit)),
    };

    let left = format!(" {} ", app.wizard.step());
    let right = format!("{} │ {} ", app.gateway_name(), app.locale());

    let used = left.chars().count() + hints.chars().count() + right.chars().count();
    let padding = (area.width as usize).saturating_sub(used).max(1);

    let status = Paragraph::new(Line::from(vec![
        Span::styled(left, theme.highlighted()),
        Span::styled(format!(" {hints}"), theme.hint()),
        Span::raw(" ".repeat(padding.saturating_sub(1))),
        Span::styled(right, theme.dim()),
    ]));
    frame.render_widget(status, area);
}

fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{} KB", bytes / KB)
    } else {
        format!("{bytes} B")
    }
}
