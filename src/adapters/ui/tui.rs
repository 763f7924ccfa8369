//! Implements InputPort. Inquire-based interactive shell.
//!
//! One loop renders whatever [`AppState::screen`] says is on screen. Esc on a prompt steps
//! back, Ctrl-C leaves the shell.

use super::progress::with_spinner;
use super::{files, render};
use crate::domain::{
    Attachment, ComplaintCategory, ComplaintDraft, ComplaintFilter, ComplaintStatus, DomainError,
    Identity, RegistrationRequest, Role, STATIONS,
};
use crate::ports::InputPort;
use crate::usecases::{
    Action, AppState, AuthMode, ComplaintService, DashboardService, DirectoryService,
    NotificationService, Screen, SessionService, View,
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use crossterm::style::Stylize;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::validator::Validation;
use inquire::{
    Confirm, CustomUserError, InquireError, Password, PasswordDisplayMode, Select, Text,
};
use std::sync::Arc;
use tracing::{debug, info};

const DATE_FORMAT: &str = "%Y-%m-%d";
const CHART_WIDTH: usize = 32;
const PAGE_SIZE: usize = 12;
const INTERRUPTED: &str = "interrupted";

/// Applies the prompt theme to every inquire prompt that follows.
pub fn apply_theme() {
    let mut config = RenderConfig::default_colored();
    config.prompt_prefix = Styled::new("›").with_fg(Color::LightCyan);
    config.highlighted_option_prefix = Styled::new("▸").with_fg(Color::LightGreen);
    config.answer = StyleSheet::new().with_fg(Color::LightCyan);
    config.help_message = StyleSheet::new().with_fg(Color::DarkGrey);
    inquire::set_global_render_config(config);
}

/// `None` when the user pressed Esc.
fn answer<T>(result: Result<T, InquireError>) -> Result<Option<T>, DomainError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled) => Ok(None),
        Err(InquireError::OperationInterrupted) => Err(DomainError::Ui(INTERRUPTED.into())),
        Err(e) => Err(DomainError::Ui(e.to_string())),
    }
}

fn required(input: &str) -> Result<Validation, CustomUserError> {
    if input.trim().is_empty() {
        Ok(Validation::Invalid("This field is required".into()))
    } else {
        Ok(Validation::Valid)
    }
}

fn password_length(input: &str) -> Result<Validation, CustomUserError> {
    if input.chars().count() < RegistrationRequest::MIN_PASSWORD_LEN {
        Ok(Validation::Invalid(
            format!(
                "At least {} characters",
                RegistrationRequest::MIN_PASSWORD_LEN
            )
            .into(),
        ))
    } else {
        Ok(Validation::Valid)
    }
}

fn date_input(input: &str) -> Result<Validation, CustomUserError> {
    match parse_date(input) {
        Some(_) => Ok(Validation::Valid),
        None => Ok(Validation::Invalid("Use YYYY-MM-DD".into())),
    }
}

fn optional_date_input(input: &str) -> Result<Validation, CustomUserError> {
    if input.trim().is_empty() {
        Ok(Validation::Valid)
    } else {
        date_input(input)
    }
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

fn non_blank(input: String) -> Option<String> {
    Some(input.trim().to_string()).filter(|s| !s.is_empty())
}

fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

fn heading(text: &str) {
    println!("\n{}", text.bold().cyan());
}

fn success(text: &str) {
    println!("{}", format!("✓ {text}").green());
}

fn failure(err: &DomainError) {
    println!("{}", format!("✗ {err}").red());
}

/// Select with an "Any" entry first. `Some(None)` means "Any", `None` means Esc.
fn pick_optional<T, F>(
    message: &str,
    values: &[T],
    current: Option<T>,
    label: F,
) -> Result<Option<Option<T>>, DomainError>
where
    T: Copy + PartialEq,
    F: Fn(T) -> String,
{
    let mut options = vec!["Any".to_string()];
    options.extend(values.iter().map(|v| label(*v)));
    let start = current
        .and_then(|c| values.iter().position(|v| *v == c))
        .map_or(0, |i| i + 1);
    let picked = answer(
        Select::new(message, options)
            .with_starting_cursor(start)
            .with_page_size(PAGE_SIZE)
            .raw_prompt(),
    )?;
    Ok(picked.map(|o| o.index.checked_sub(1).map(|i| values[i])))
}

/// Prompts for every filter field, starting from `current`. `None` on Esc.
fn edit_filter(current: &ComplaintFilter) -> Result<Option<ComplaintFilter>, DomainError> {
    let search_init = current.search.clone().unwrap_or_default();
    let Some(search) = answer(
        Text::new("Search title and description:")
            .with_initial_value(&search_init)
            .prompt(),
    )?
    else {
        return Ok(None);
    };
    let Some(category) = pick_optional(
        "Category:",
        &ComplaintCategory::ALL,
        current.category,
        |c| c.label().to_string(),
    )?
    else {
        return Ok(None);
    };
    let Some(status) = pick_optional("Status:", &ComplaintStatus::ALL, current.status, |s| {
        s.label().to_string()
    })?
    else {
        return Ok(None);
    };
    let Some(station) = pick_optional(
        "Station:",
        &STATIONS,
        current.station.as_deref(),
        str::to_string,
    )?
    else {
        return Ok(None);
    };
    let station = station.map(str::to_string);

    let fmt = |d: Option<NaiveDate>| {
        d.map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    };
    let (from_init, to_init) = (fmt(current.date_from), fmt(current.date_to));
    let Some(from) = answer(
        Text::new("From date:")
            .with_initial_value(&from_init)
            .with_help_message("YYYY-MM-DD, blank for any")
            .with_validator(optional_date_input)
            .prompt(),
    )?
    else {
        return Ok(None);
    };
    let Some(to) = answer(
        Text::new("To date:")
            .with_initial_value(&to_init)
            .with_help_message("YYYY-MM-DD, blank for any")
            .with_validator(optional_date_input)
            .prompt(),
    )?
    else {
        return Ok(None);
    };

    Ok(Some(ComplaintFilter {
        search: Some(search).filter(|s| !s.trim().is_empty()),
        category,
        status,
        station,
        date_from: parse_date(&from),
        date_to: parse_date(&to),
    }))
}

enum Flow {
    Continue,
    Quit,
}

/// What happens after a view: show the navigation menu, or loop straight back because the
/// view already moved the state.
enum Next {
    Menu,
    Stay,
}

/// Per-run state. The list filter survives moving between views.
struct Shell {
    state: AppState,
    filter: ComplaintFilter,
}

/// TUI adapter. Inquire prompts over the use-case services.
pub struct TuiInputPort {
    session: Arc<SessionService>,
    complaints: Arc<ComplaintService>,
    dashboard: Arc<DashboardService>,
    notifications: Arc<NotificationService>,
    directory: Arc<DirectoryService>,
}

impl TuiInputPort {
    pub fn new(
        session: Arc<SessionService>,
        complaints: Arc<ComplaintService>,
        dashboard: Arc<DashboardService>,
        notifications: Arc<NotificationService>,
        directory: Arc<DirectoryService>,
    ) -> Self {
        Self {
            session,
            complaints,
            dashboard,
            notifications,
            directory,
        }
    }

    async fn login(&self, shell: &mut Shell) -> Result<Flow, DomainError> {
        heading("Sign in");
        let Some(choice) = answer(
            Select::new("Welcome", vec!["Sign in", "Create an account", "Quit"]).raw_prompt(),
        )?
        else {
            return Ok(Flow::Quit);
        };
        match choice.index {
            0 => {}
            1 => {
                shell
                    .state
                    .dispatch(Action::SwitchAuthMode(AuthMode::Register));
                return Ok(Flow::Continue);
            }
            _ => return Ok(Flow::Quit),
        }

        let Some(email) = answer(
            Text::new("Email:")
                .with_validator(required)
                .with_help_message("Demo: voyageur@example.com or agent@example.com, password123")
                .prompt(),
        )?
        else {
            return Ok(Flow::Continue);
        };
        let Some(password) = answer(
            Password::new("Password:")
                .without_confirmation()
                .with_display_mode(PasswordDisplayMode::Masked)
                .prompt(),
        )?
        else {
            return Ok(Flow::Continue);
        };
        let Some(role) = answer(Select::new("Sign in as:", Role::ALL.to_vec()).prompt())? else {
            return Ok(Flow::Continue);
        };

        let who = with_spinner(
            "Signing in...",
            self.session.sign_in(&email, &password, role),
        )
        .await?;
        success(&format!("Welcome, {}", who.name));
        shell.state.dispatch(Action::SignedIn(who));
        Ok(Flow::Continue)
    }

    async fn register(&self, shell: &mut Shell) -> Result<Flow, DomainError> {
        heading("Create an account");
        let back = |shell: &mut Shell| {
            shell.state.dispatch(Action::SwitchAuthMode(AuthMode::Login));
            Ok(Flow::Continue)
        };

        let Some(name) = answer(Text::new("Full name:").with_validator(required).prompt())? else {
            return back(shell);
        };
        let Some(email) = answer(Text::new("Email:").with_validator(required).prompt())? else {
            return back(shell);
        };
        let Some(phone) = answer(
            Text::new("Phone:")
                .with_help_message("Optional")
                .prompt(),
        )?
        else {
            return back(shell);
        };
        let Some(password) = answer(
            Password::new("Password:")
                .with_display_mode(PasswordDisplayMode::Masked)
                .with_validator(password_length)
                .with_custom_confirmation_message("Confirm password:")
                .with_custom_confirmation_error_message("Passwords do not match")
                .prompt(),
        )?
        else {
            return back(shell);
        };
        let Some(role) = answer(Select::new("Account type:", Role::ALL.to_vec()).prompt())? else {
            return back(shell);
        };

        let request = RegistrationRequest {
            name,
            email,
            password,
            phone: non_blank(phone),
            role,
        };
        let who = with_spinner("Creating account...", self.session.sign_up(request)).await?;
        success(&format!("Account created. Welcome, {}", who.name));
        shell.state.dispatch(Action::SignedIn(who));
        Ok(Flow::Continue)
    }

    async fn view(&self, shell: &mut Shell, view: View) -> Result<Flow, DomainError> {
        let who = shell
            .state
            .session()
            .cloned()
            .ok_or(DomainError::NotAuthenticated)?;
        debug!(view = ?view, user_id = %who.id, "render view");
        let outcome = match view {
            View::NewComplaint => self.new_complaint(shell, &who).await,
            View::MyComplaints | View::AllComplaints => {
                self.complaint_list(shell, &who, view).await
            }
            View::Dashboard => self.dashboard_view(&who).await,
            View::Notifications => self.notifications_view(shell, &who).await,
            View::Directory => self.directory_view().await,
        };
        let next = match outcome {
            Ok(next) => next,
            Err(e @ DomainError::Ui(_)) => return Err(e),
            Err(e) => {
                failure(&e);
                Next::Menu
            }
        };
        match next {
            Next::Stay => Ok(Flow::Continue),
            Next::Menu => self.menu(shell, &who).await,
        }
    }

    async fn menu(&self, shell: &mut Shell, who: &Identity) -> Result<Flow, DomainError> {
        let unread = self.notifications.unread_count(who).await?;
        let views = shell.state.menu();
        let mut options: Vec<String> = views
            .iter()
            .map(|v| match v {
                View::Notifications if unread > 0 => format!("{} ({unread} unread)", v.label()),
                _ => v.label().to_string(),
            })
            .collect();
        options.push("Sign out".into());
        options.push("Quit".into());
        let start = shell
            .state
            .active_view()
            .and_then(|active| views.iter().position(|v| *v == active))
            .unwrap_or(0);

        let title = format!("{} ({})", who.name, who.role);
        let Some(choice) = answer(
            Select::new(&title, options)
                .with_starting_cursor(start)
                .raw_prompt(),
        )?
        else {
            return Ok(Flow::Continue);
        };
        match views.get(choice.index) {
            Some(view) => shell.state.dispatch(Action::Navigate(*view)),
            None if choice.index == views.len() => {
                self.session.sign_out().await?;
                shell.filter = ComplaintFilter::default();
                shell.state.dispatch(Action::SignedOut);
                success("Signed out");
            }
            None => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn new_complaint(&self, shell: &mut Shell, who: &Identity) -> Result<Next, DomainError> {
        heading("New complaint");
        let Some(title) = answer(Text::new("Title:").with_validator(required).prompt())? else {
            return Ok(Next::Menu);
        };
        let Some(description) = answer(
            Text::new("Description:")
                .with_validator(required)
                .prompt(),
        )?
        else {
            return Ok(Next::Menu);
        };
        let Some(category) = answer(
            Select::new("Category:", ComplaintCategory::ALL.to_vec())
                .with_page_size(PAGE_SIZE)
                .prompt(),
        )?
        else {
            return Ok(Next::Menu);
        };
        let Some(station) = answer(
            Select::new("Station:", STATIONS.to_vec())
                .with_page_size(PAGE_SIZE)
                .prompt(),
        )?
        else {
            return Ok(Next::Menu);
        };
        let Some(line) = answer(
            Text::new("Line:")
                .with_help_message("Optional, e.g. Alger - Oran")
                .prompt(),
        )?
        else {
            return Ok(Next::Menu);
        };
        let today = Utc::now().date_naive().format(DATE_FORMAT).to_string();
        let Some(date) = answer(
            Text::new("Date of the incident:")
                .with_default(&today)
                .with_validator(date_input)
                .prompt(),
        )?
        else {
            return Ok(Next::Menu);
        };
        let date = parse_date(&date)
            .ok_or_else(|| DomainError::Validation(format!("invalid date: {date}")))?;
        let Some(attachments) = self.pick_attachments().await? else {
            return Ok(Next::Menu);
        };

        let draft = ComplaintDraft {
            title,
            description,
            category,
            station: station.to_string(),
            line: non_blank(line),
            date,
            attachments,
        };
        let question = format!(
            "Submit \"{}\" with {} attachment(s)?",
            draft.title.trim(),
            draft.attachments.len()
        );
        let Some(true) = answer(Confirm::new(&question).with_default(true).prompt())? else {
            println!("Discarded.");
            return Ok(Next::Menu);
        };

        let created = with_spinner("Submitting...", self.complaints.create(who, draft)).await?;
        success(&format!(
            "Complaint submitted (ref {})",
            short_id(&created.id)
        ));
        shell.state.dispatch(Action::Navigate(View::MyComplaints));
        Ok(Next::Stay)
    }

    /// Attachment picker loop. `None` when the user backs out of the form.
    async fn pick_attachments(&self) -> Result<Option<Vec<Attachment>>, DomainError> {
        const ADD: &str = "Add files";
        const REMOVE: &str = "Remove a file";
        const DONE: &str = "Continue";

        let help = format!(
            "Images, videos, audio and PDF, up to {} each",
            render::format_file_size(self.complaints.max_attachment_bytes())
        );
        let mut picked: Vec<Attachment> = Vec::new();
        loop {
            if !picked.is_empty() {
                println!("Attachments:");
                for a in &picked {
                    println!("  {}", render::attachment_row(a));
                }
            }
            let mut options = vec![ADD, DONE];
            if !picked.is_empty() {
                options.insert(1, REMOVE);
            }
            let Some(choice) = answer(
                Select::new("Attachments:", options)
                    .with_help_message(&help)
                    .prompt(),
            )?
            else {
                return Ok(None);
            };
            match choice {
                ADD => {
                    let Some(input) = answer(
                        Text::new("File paths:")
                            .with_help_message("Comma separated")
                            .prompt(),
                    )?
                    else {
                        continue;
                    };
                    let (found, problems) = files::probe_all(&input).await;
                    for p in &problems {
                        println!("{}", format!("✗ {p}").red());
                    }
                    let intake = self.complaints.intake_files(found);
                    for e in &intake.rejected {
                        failure(e);
                    }
                    for a in &intake.accepted {
                        success(&format!("Added {}", render::attachment_row(a)));
                    }
                    picked.extend(intake.accepted);
                }
                REMOVE => {
                    let rows: Vec<String> = picked.iter().map(render::attachment_row).collect();
                    if let Some(o) = answer(Select::new("Remove which file?", rows).raw_prompt())? {
                        let removed = picked.remove(o.index);
                        println!("Removed {}", removed.name);
                    }
                }
                _ => return Ok(Some(picked)),
            }
        }
    }

    async fn complaint_list(
        &self,
        shell: &mut Shell,
        who: &Identity,
        view: View,
    ) -> Result<Next, DomainError> {
        const FILTER: &str = "Filter...";
        const CLEAR: &str = "Clear filter";

        heading(view.label());
        let rows = with_spinner(
            "Loading complaints...",
            self.complaints.list(who, &shell.filter),
        )
        .await?;
        if !shell.filter.is_empty() {
            println!("Filter: {}", render::filter_summary(&shell.filter));
        }
        if rows.is_empty() {
            println!("No complaints.");
        }

        let mut options: Vec<String> = rows.iter().map(render::complaint_row).collect();
        options.push(FILTER.into());
        if !shell.filter.is_empty() {
            options.push(CLEAR.into());
        }
        options.push("Back to menu".into());
        let title = format!("{} complaint(s)", rows.len());
        let Some(choice) = answer(
            Select::new(&title, options)
                .with_page_size(PAGE_SIZE)
                .raw_prompt(),
        )?
        else {
            return Ok(Next::Menu);
        };

        if let Some(c) = rows.get(choice.index) {
            shell.state.dispatch(Action::SelectComplaint(c.id.clone()));
            return Ok(Next::Stay);
        }
        match choice.value.as_str() {
            FILTER => {
                if let Some(f) = edit_filter(&shell.filter)? {
                    shell.filter = f;
                }
                Ok(Next::Stay)
            }
            CLEAR => {
                shell.filter = ComplaintFilter::default();
                Ok(Next::Stay)
            }
            _ => Ok(Next::Menu),
        }
    }

    async fn detail(&self, shell: &mut Shell, id: &str) -> Result<Flow, DomainError> {
        let who = shell
            .state
            .session()
            .cloned()
            .ok_or(DomainError::NotAuthenticated)?;
        let complaint =
            with_spinner("Loading complaint...", self.complaints.get(&who, id)).await?;

        heading(&format!("Complaint {}", short_id(&complaint.id)));
        for (i, line) in render::complaint_detail(&complaint).iter().enumerate() {
            if i == 0 {
                println!("{}", line.as_str().bold());
            } else {
                println!("{line}");
            }
        }
        println!("\n{}", "History".bold());
        for line in render::history_lines(&complaint) {
            println!("  {line}");
        }

        let transitions = self.complaints.available_transitions(&who, &complaint);
        let mut options: Vec<String> = transitions
            .iter()
            .map(|s| format!("Mark as {}", s.label()))
            .collect();
        options.push("Back".into());
        let Some(choice) = answer(Select::new("Action:", options).raw_prompt())? else {
            shell.state.dispatch(Action::Back);
            return Ok(Flow::Continue);
        };
        let Some(&to) = transitions.get(choice.index) else {
            shell.state.dispatch(Action::Back);
            return Ok(Flow::Continue);
        };

        let Some(comment) = answer(
            Text::new("Comment:")
                .with_help_message("Optional, shown to the traveler")
                .prompt(),
        )?
        else {
            return Ok(Flow::Continue);
        };
        match with_spinner(
            "Updating status...",
            self.complaints
                .transition(&who, &complaint.id, to, non_blank(comment)),
        )
        .await
        {
            Ok(updated) => success(&format!("Status changed to {}", updated.status.label())),
            Err(e) => failure(&e),
        }
        Ok(Flow::Continue)
    }

    async fn dashboard_view(&self, who: &Identity) -> Result<Next, DomainError> {
        heading("Dashboard");
        let stats = with_spinner("Aggregating...", self.dashboard.stats(who)).await?;
        for line in render::dashboard(&stats, CHART_WIDTH) {
            println!("{line}");
        }
        Ok(Next::Menu)
    }

    async fn notifications_view(
        &self,
        shell: &mut Shell,
        who: &Identity,
    ) -> Result<Next, DomainError> {
        const MARK_ALL: &str = "Mark all as read";

        heading("Notifications");
        let notices = self.notifications.list(who).await?;
        if notices.is_empty() {
            println!("No notifications.");
            return Ok(Next::Menu);
        }
        let unread = notices.iter().filter(|n| !n.read).count();
        println!("{unread} unread");

        let mut options: Vec<String> = notices.iter().map(render::notification_row).collect();
        if unread > 0 {
            options.push(MARK_ALL.into());
        }
        options.push("Back to menu".into());
        let Some(choice) = answer(
            Select::new("Open a notification:", options)
                .with_page_size(PAGE_SIZE)
                .raw_prompt(),
        )?
        else {
            return Ok(Next::Menu);
        };

        if let Some(n) = notices.get(choice.index) {
            if !n.read {
                self.notifications.mark_read(who, &n.id).await?;
            }
            if let Some(cid) = &n.complaint_id {
                shell.state.dispatch(Action::SelectComplaint(cid.clone()));
            }
            return Ok(Next::Stay);
        }
        if choice.value == MARK_ALL {
            let changed = self.notifications.mark_all_read(who).await?;
            success(&format!("{changed} marked as read"));
            return Ok(Next::Stay);
        }
        Ok(Next::Menu)
    }

    async fn directory_view(&self) -> Result<Next, DomainError> {
        heading("Directory");
        for role in Role::ALL {
            let people = self.directory.by_role(role).await?;
            println!("\n{} ({})", role.label().bold(), people.len());
            for p in &people {
                println!("  {}", render::identity_row(p));
            }
        }
        Ok(Next::Menu)
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        let mut shell = Shell {
            state: AppState::restored(self.session.current().await),
            filter: ComplaintFilter::default(),
        };
        loop {
            let screen = shell.state.screen();
            let step = match &screen {
                Screen::Login => self.login(&mut shell).await,
                Screen::Register => self.register(&mut shell).await,
                Screen::Detail(id) => self.detail(&mut shell, id).await,
                Screen::View(view) => self.view(&mut shell, *view).await,
            };
            match step {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(DomainError::Ui(msg)) if msg == INTERRUPTED => break,
                Err(e @ DomainError::Ui(_)) => return Err(e),
                Err(e) => {
                    failure(&e);
                    if matches!(screen, Screen::Detail(_)) {
                        shell.state.dispatch(Action::Back);
                    }
                }
            }
        }
        info!("shell closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_not_an_error() {
        assert_eq!(answer::<u8>(Err(InquireError::OperationCanceled)), Ok(None));
        assert_eq!(answer(Ok(3u8)), Ok(Some(3)));
        assert_eq!(
            answer::<u8>(Err(InquireError::OperationInterrupted)),
            Err(DomainError::Ui(INTERRUPTED.into()))
        );
    }

    #[test]
    fn date_validation() {
        assert_eq!(
            parse_date(" 2024-01-15 "),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert_eq!(parse_date("15/01/2024"), None);
        assert!(matches!(optional_date_input(""), Ok(Validation::Valid)));
        assert!(matches!(
            optional_date_input("soon"),
            Ok(Validation::Invalid(_))
        ));
    }

    #[test]
    fn blank_inputs_become_none() {
        assert_eq!(non_blank("   ".into()), None);
        assert_eq!(non_blank(" Alger - Oran ".into()), Some("Alger - Oran".into()));
        assert_eq!(short_id("0123456789abcdef"), "01234567");
    }
}
