// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::OffsetDateTime;

use crate::{
    Application, ApplicationId, ApplicationStatus, Locale, MutationOutcome, Roster, StatusFilter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabKind {
    Applications,
    Team,
}

impl TabKind {
    pub const ALL: [Self; 2] = [Self::Applications, Self::Team];

    pub const fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::En, Self::Applications) => "applications",
            (Locale::En, Self::Team) => "team",
            (Locale::Ru, Self::Applications) => "Заявки",
            (Locale::Ru, Self::Team) => "Команда",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Search,
    Detail,
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_tab: TabKind,
    pub locale: Locale,
    pub search: String,
    pub status_filter: StatusFilter,
    /// Row index into the filtered view.
    pub selected: usize,
    /// Application shown in the detail overlay; pinned by id so it stays put
    /// when a status change drops it out of the current filter.
    pub detail: Option<ApplicationId>,
    pub comment_draft: String,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            active_tab: TabKind::Applications,
            locale: Locale::default(),
            search: String::new(),
            status_filter: StatusFilter::All,
            selected: 0,
            detail: None,
            comment_draft: String::new(),
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Tick,
    NextTab,
    PrevTab,
    BeginSearch,
    SearchInput(char),
    SearchBackspace,
    EndSearch,
    ClearSearch,
    CycleStatusFilter,
    SetStatusFilter(StatusFilter),
    MoveSelection(isize),
    OpenDetail,
    CloseDetail,
    SetApplicationStatus(ApplicationStatus),
    BeginComment,
    CommentInput(char),
    CommentBackspace,
    SubmitComment { at: OffsetDateTime },
    CancelComment,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    RosterTicked,
    ModeChanged(AppMode),
    TabChanged(TabKind),
    SearchChanged(String),
    FilterChanged(StatusFilter),
    SelectionChanged(usize),
    ApplicationStatusChanged {
        id: ApplicationId,
        status: ApplicationStatus,
    },
    CommentAdded(ApplicationId),
    CommentRejected,
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, roster: &mut Roster, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Tick => {
                roster.tick();
                vec![AppEvent::RosterTicked]
            }
            AppCommand::NextTab => self.rotate_tab(1),
            AppCommand::PrevTab => self.rotate_tab(-1),
            AppCommand::BeginSearch => self.set_mode(AppMode::Search),
            AppCommand::SearchInput(ch) => {
                self.search.push(ch);
                self.search_changed(roster)
            }
            AppCommand::SearchBackspace => {
                if self.search.pop().is_none() {
                    return Vec::new();
                }
                self.search_changed(roster)
            }
            AppCommand::EndSearch => self.set_mode(AppMode::Nav),
            AppCommand::ClearSearch => {
                if self.search.is_empty() {
                    return Vec::new();
                }
                self.search.clear();
                self.search_changed(roster)
            }
            AppCommand::CycleStatusFilter => {
                let next = self.status_filter.next();
                self.set_filter(roster, next)
            }
            AppCommand::SetStatusFilter(filter) => self.set_filter(roster, filter),
            AppCommand::MoveSelection(delta) => {
                let len = self.visible(roster).len();
                if len == 0 {
                    self.selected = 0;
                    return Vec::new();
                }
                let next = (self.selected as isize + delta).clamp(0, len as isize - 1) as usize;
                if next == self.selected {
                    return Vec::new();
                }
                self.selected = next;
                vec![AppEvent::SelectionChanged(next)]
            }
            AppCommand::OpenDetail => {
                let Some(id) = self.selected_application(roster).map(|app| app.id.clone()) else {
                    return vec![self.set_status("no application selected")];
                };
                self.detail = Some(id);
                self.set_mode(AppMode::Detail)
            }
            AppCommand::CloseDetail => {
                self.detail = None;
                self.clamp_selection(roster);
                self.set_mode(AppMode::Nav)
            }
            AppCommand::SetApplicationStatus(status) => self.apply_status(roster, status),
            AppCommand::BeginComment => {
                if self.detail.is_none() {
                    return Vec::new();
                }
                self.set_mode(AppMode::Comment)
            }
            AppCommand::CommentInput(ch) => {
                self.comment_draft.push(ch);
                Vec::new()
            }
            AppCommand::CommentBackspace => {
                self.comment_draft.pop();
                Vec::new()
            }
            AppCommand::SubmitComment { at } => self.submit_comment(roster, at),
            AppCommand::CancelComment => self.set_mode(AppMode::Detail),
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    pub fn visible<'a>(&self, roster: &'a Roster) -> Vec<&'a Application> {
        roster.filter(&self.search, self.status_filter)
    }

    pub fn selected_application<'a>(&self, roster: &'a Roster) -> Option<&'a Application> {
        self.visible(roster).get(self.selected).copied()
    }

    pub fn detail_application<'a>(&self, roster: &'a Roster) -> Option<&'a Application> {
        self.detail.as_ref().and_then(|id| roster.get(id))
    }

    fn apply_status(&mut self, roster: &mut Roster, status: ApplicationStatus) -> Vec<AppEvent> {
        let target = match &self.detail {
            Some(id) => Some(id.clone()),
            None => self.selected_application(roster).map(|app| app.id.clone()),
        };
        let Some(id) = target else {
            return vec![self.set_status("no application selected")];
        };

        if !roster.set_status(&id, status).applied() {
            return Vec::new();
        }
        self.clamp_selection(roster);
        let message = format!("{id}: {}", status.label(self.locale));
        vec![
            AppEvent::ApplicationStatusChanged { id, status },
            self.set_status(&message),
        ]
    }

    fn submit_comment(&mut self, roster: &mut Roster, at: OffsetDateTime) -> Vec<AppEvent> {
        let Some(id) = self.detail.clone() else {
            return Vec::new();
        };
        match roster.add_comment(&id, &self.comment_draft, at) {
            MutationOutcome::Applied => {
                self.comment_draft.clear();
                self.mode = AppMode::Detail;
                vec![
                    AppEvent::CommentAdded(id),
                    AppEvent::ModeChanged(self.mode),
                ]
            }
            MutationOutcome::EmptyComment => {
                vec![
                    AppEvent::CommentRejected,
                    self.set_status("comment is empty"),
                ]
            }
            MutationOutcome::UnknownApplication => {
                let message = format!("application {id} not found");
                vec![AppEvent::CommentRejected, self.set_status(&message)]
            }
        }
    }

    fn set_filter(&mut self, roster: &Roster, filter: StatusFilter) -> Vec<AppEvent> {
        self.status_filter = filter;
        self.clamp_selection(roster);
        let label = format!("filter: {}", filter.label(self.locale));
        vec![AppEvent::FilterChanged(filter), self.set_status(&label)]
    }

    fn search_changed(&mut self, roster: &Roster) -> Vec<AppEvent> {
        self.clamp_selection(roster);
        vec![AppEvent::SearchChanged(self.search.clone())]
    }

    fn clamp_selection(&mut self, roster: &Roster) {
        let len = self.visible(roster).len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    fn set_mode(&mut self, mode: AppMode) -> Vec<AppEvent> {
        self.mode = mode;
        vec![AppEvent::ModeChanged(mode)]
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = TabKind::ALL;
        let current = tabs
            .iter()
            .position(|tab| *tab == self.active_tab)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_tab = tabs[next];
        vec![AppEvent::TabChanged(self.active_tab)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
