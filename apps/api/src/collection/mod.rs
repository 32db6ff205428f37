//! Collection controller: the session's analyzed candidates and everything derived from them.
//!
//! The sequence is append-only: results are added one per successful analysis
//! and only `clear_all` removes them. Filtering and sorting derive a view and
//! never touch the sequence. Selection and expansion are keyed by id and
//! survive filter and sort changes.
//!
//! The controller never awaits. Remote calls run outside the lock: callers
//! `begin_*`, release, await the client, then `finish_*`.

pub mod filter;
pub mod handlers;

use std::collections::HashSet;

use serde::Serialize;
use tracing::{info, warn};

use crate::collection::filter::{sort_results, FilterCriteria, SortMode};
use crate::comparison::MIN_CANDIDATES;
use crate::errors::ScreeningError;
use crate::models::{AnalysisResult, ComparisonInsight, ScoreTier};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    List,
    Comparison,
}

/// Identifies one comparison request. Completions carrying an outdated ticket
/// are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonTicket(u64);

#[derive(Debug, Clone, Default)]
enum ComparisonState {
    #[default]
    Idle,
    Comparing(ComparisonTicket),
    Ready(ComparisonInsight),
    Failed(String),
}

/// Everything a comparison call needs, captured when it starts.
#[derive(Debug, Clone)]
pub struct PendingComparison {
    pub ticket: ComparisonTicket,
    /// Selected candidates in sequence order.
    pub candidates: Vec<AnalysisResult>,
    pub job_description: String,
}

#[derive(Debug, Default)]
pub struct CollectionController {
    results: Vec<AnalysisResult>,
    selected: HashSet<String>,
    expanded: HashSet<String>,
    filter: FilterCriteria,
    sort: SortMode,
    job_description: String,
    view: View,
    analyses_in_flight: usize,
    analysis_error: Option<String>,
    comparison: ComparisonState,
    last_ticket: u64,
}

impl CollectionController {
    pub fn new() -> Self {
        Self::default()
    }

    // ── sequence ───────────────────────────────────────────────────────────

    /// Appends a result. Re-analyses of the same résumé are separate entries;
    /// only a repeated id is refused.
    pub fn add_result(&mut self, result: AnalysisResult) -> bool {
        if self.contains(&result.id) {
            warn!("Refusing result with duplicate id {}", result.id);
            return false;
        }
        self.results.push(result);
        true
    }

    /// Empties the collection and every piece of state tied to it.
    /// Any comparison still in flight is dropped when it completes.
    pub fn clear_all(&mut self) {
        info!("Clearing {} analyzed candidates", self.results.len());
        self.results.clear();
        self.selected.clear();
        self.expanded.clear();
        self.filter = FilterCriteria::default();
        self.sort = SortMode::default();
        self.view = View::List;
        self.analysis_error = None;
        self.comparison = ComparisonState::Idle;
    }

    #[cfg(test)]
    pub fn results(&self) -> &[AnalysisResult] {
        &self.results
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.results.iter().any(|r| r.id == id)
    }

    // ── selection / expansion ──────────────────────────────────────────────

    /// Flips selection. Returns `false` for an unknown id.
    pub fn toggle_select(&mut self, id: &str) -> bool {
        toggle(&mut self.selected, id, self.results.iter().any(|r| r.id == id))
    }

    /// Flips the detail view. Returns `false` for an unknown id.
    pub fn toggle_expand(&mut self, id: &str) -> bool {
        toggle(&mut self.expanded, id, self.results.iter().any(|r| r.id == id))
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.contains(id)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Selected results in sequence order, regardless of selection order or filters.
    pub fn selected(&self) -> Vec<&AnalysisResult> {
        self.results
            .iter()
            .filter(|r| self.selected.contains(&r.id))
            .collect()
    }

    pub fn can_compare(&self) -> bool {
        self.selected.len() >= MIN_CANDIDATES
    }

    // ── filter / sort ──────────────────────────────────────────────────────

    pub fn set_filter(&mut self, criteria: FilterCriteria) {
        self.filter = criteria;
    }

    pub fn reset_filters(&mut self) {
        self.filter = FilterCriteria::default();
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn filters_active(&self) -> bool {
        self.filter.is_active()
    }

    pub fn set_sort(&mut self, mode: SortMode) {
        self.sort = mode;
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    /// `sort(filter(all))`, recomputed on every call.
    pub fn visible(&self) -> Vec<&AnalysisResult> {
        let mut view: Vec<&AnalysisResult> = self
            .results
            .iter()
            .filter(|r| self.filter.matches(r))
            .collect();
        sort_results(&mut view, self.sort);
        view
    }

    // ── job description ────────────────────────────────────────────────────

    pub fn set_job_description(&mut self, job_description: String) {
        self.job_description = job_description;
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    // ── analysis channel ───────────────────────────────────────────────────

    /// Marks one analysis as started and clears the previous analysis error.
    /// Returns the job description to analyze against.
    pub fn begin_analysis(&mut self) -> String {
        self.analyses_in_flight += 1;
        self.analysis_error = None;
        self.job_description.clone()
    }

    /// Records one analysis outcome: appends on success, stores the message on failure.
    pub fn finish_analysis(&mut self, outcome: &Result<AnalysisResult, ScreeningError>) {
        self.analyses_in_flight = self.analyses_in_flight.saturating_sub(1);
        match outcome {
            Ok(result) => {
                self.add_result(result.clone());
            }
            Err(e) => self.analysis_error = Some(e.to_string()),
        }
    }

    pub fn analyses_in_flight(&self) -> usize {
        self.analyses_in_flight
    }

    pub fn analysis_error(&self) -> Option<&str> {
        self.analysis_error.as_deref()
    }

    /// Clears the displayed error only.
    pub fn dismiss_analysis_error(&mut self) {
        self.analysis_error = None;
    }

    // ── comparison channel ─────────────────────────────────────────────────

    /// Starts a comparison of the current selection. `None` (and no state
    /// change) when fewer than two candidates are selected.
    pub fn begin_comparison(&mut self) -> Option<PendingComparison> {
        if !self.can_compare() {
            return None;
        }

        self.last_ticket += 1;
        let ticket = ComparisonTicket(self.last_ticket);
        self.view = View::Comparison;
        self.comparison = ComparisonState::Comparing(ticket);

        Some(PendingComparison {
            ticket,
            candidates: self.selected().into_iter().cloned().collect(),
            job_description: self.job_description.clone(),
        })
    }

    /// Applies a comparison outcome if `ticket` is still the current request.
    /// Returns whether it was applied.
    pub fn finish_comparison(
        &mut self,
        ticket: ComparisonTicket,
        outcome: Result<ComparisonInsight, ScreeningError>,
    ) -> bool {
        if !matches!(self.comparison, ComparisonState::Comparing(current) if current == ticket) {
            info!("Dropping stale comparison result (ticket {})", ticket.0);
            return false;
        }

        self.comparison = match outcome {
            Ok(insight) => ComparisonState::Ready(insight),
            Err(e) => ComparisonState::Failed(e.to_string()),
        };
        true
    }

    /// Leaves the comparison view, discarding its insight or error.
    pub fn close_comparison(&mut self) {
        self.view = View::List;
        self.comparison = ComparisonState::Idle;
    }

    #[cfg(test)]
    pub fn is_comparing(&self) -> bool {
        matches!(self.comparison, ComparisonState::Comparing(_))
    }

    #[cfg(test)]
    pub fn insight(&self) -> Option<&ComparisonInsight> {
        match &self.comparison {
            ComparisonState::Ready(insight) => Some(insight),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn comparison_error(&self) -> Option<&str> {
        match &self.comparison {
            ComparisonState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Clears the displayed error only.
    pub fn dismiss_comparison_error(&mut self) {
        if matches!(self.comparison, ComparisonState::Failed(_)) {
            self.comparison = ComparisonState::Idle;
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    // ── snapshot ───────────────────────────────────────────────────────────

    /// Everything the presentation layer renders, in one serializable value.
    pub fn snapshot(&self) -> SessionSnapshot {
        let candidates = self
            .visible()
            .into_iter()
            .map(|r| CandidateCard {
                selected: self.is_selected(&r.id),
                expanded: self.is_expanded(&r.id),
                score_tier: r.score_tier(),
                experience_years: r.experience_years(),
                matched_skills: self
                    .filter
                    .matching_skills(r)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                result: r.clone(),
            })
            .collect::<Vec<_>>();

        let comparison = match &self.comparison {
            ComparisonState::Idle => ComparisonStatus::Idle,
            ComparisonState::Comparing(_) => ComparisonStatus::Comparing,
            ComparisonState::Ready(insight) => ComparisonStatus::Ready {
                insight: insight.clone(),
            },
            ComparisonState::Failed(message) => ComparisonStatus::Failed {
                message: message.clone(),
            },
        };

        SessionSnapshot {
            job_description: self.job_description().to_string(),
            total_count: self.results.len(),
            visible_count: candidates.len(),
            selected_count: self.selected.len(),
            can_compare: self.can_compare(),
            filter: self.filter().clone(),
            filters_active: self.filters_active(),
            sort: self.sort(),
            view: self.view(),
            analyses_in_flight: self.analyses_in_flight(),
            analysis_error: self.analysis_error().map(str::to_string),
            candidates,
            comparison,
        }
    }
}

fn toggle(set: &mut HashSet<String>, id: &str, known: bool) -> bool {
    if !known {
        return false;
    }
    if !set.remove(id) {
        set.insert(id.to_string());
    }
    true
}

/// One visible candidate with its per-session display flags.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateCard {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub selected: bool,
    pub expanded: bool,
    pub score_tier: ScoreTier,
    pub experience_years: f64,
    /// Key skills matching the active skill filter, for highlighting.
    pub matched_skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonStatus {
    Idle,
    Comparing,
    Ready { insight: ComparisonInsight },
    Failed { message: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub job_description: String,
    pub total_count: usize,
    pub visible_count: usize,
    pub selected_count: usize,
    pub can_compare: bool,
    pub filter: FilterCriteria,
    pub filters_active: bool,
    pub sort: SortMode,
    pub view: View,
    pub analyses_in_flight: usize,
    pub analysis_error: Option<String>,
    pub candidates: Vec<CandidateCard>,
    pub comparison: ComparisonStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::comparison::CandidateComparisonDetail;
    use crate::models::CandidateProfile;

    fn result(id: &str, name: &str, score: f64, experience: &str, skills: &[&str]) -> AnalysisResult {
        AnalysisResult::new(
            id.to_string(),
            CandidateProfile {
                candidate_name: name.to_string(),
                email: None,
                phone: None,
                key_skills: skills.iter().map(|s| s.to_string()).collect(),
                education: vec![],
                total_experience: experience.to_string(),
                suitable_job_roles: vec![],
                job_fit_score: score,
                job_fit_score_reason: "n/a".to_string(),
            },
        )
    }

    /// The three-candidate fixture: scores [3,6,9], experience
    /// ["1 year","5+ years","10 years"], skills [[Go],[Python],[Go,Python]].
    fn seeded() -> CollectionController {
        let mut c = CollectionController::new();
        c.add_result(result("a", "Ann", 3.0, "1 year", &["Go"]));
        c.add_result(result("b", "Ben", 6.0, "5+ years", &["Python"]));
        c.add_result(result("c", "Cat", 9.0, "10 years", &["Go", "Python"]));
        c
    }

    fn visible_ids(c: &CollectionController) -> Vec<String> {
        c.visible().iter().map(|r| r.id.clone()).collect()
    }

    fn sorted_ids(c: &CollectionController) -> Vec<String> {
        let mut ids: Vec<String> = c.results().iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids
    }

    fn insight(names: &[&str]) -> ComparisonInsight {
        ComparisonInsight {
            best_fit_candidate_name: names[0].to_string(),
            recommendation_reason: "Best overall.".to_string(),
            candidate_comparison: names
                .iter()
                .map(|n| CandidateComparisonDetail {
                    candidate_name: n.to_string(),
                    strengths: vec![],
                    weaknesses: vec![],
                })
                .collect(),
        }
    }

    #[test]
    fn test_view_operations_never_change_the_sequence() {
        let mut c = seeded();
        let before = sorted_ids(&c);

        c.set_filter(FilterCriteria {
            min_score: 8.0,
            ..Default::default()
        });
        c.set_sort(SortMode::Experience);
        c.toggle_select("a");
        c.toggle_expand("b");
        c.toggle_select("a");
        c.reset_filters();
        c.set_sort(SortMode::Score);

        assert_eq!(sorted_ids(&c), before);
        assert_eq!(c.results()[0].id, "a");
    }

    #[test]
    fn test_clear_all_empties_everything() {
        let mut c = seeded();
        c.toggle_select("a");
        c.toggle_select("b");
        c.toggle_expand("c");
        c.set_filter(FilterCriteria {
            skill: "go".to_string(),
            ..Default::default()
        });
        c.set_sort(SortMode::Score);
        c.begin_comparison().unwrap();

        c.clear_all();

        assert!(c.is_empty());
        assert!(c.selected().is_empty());
        assert!(!c.is_expanded("c"));
        assert!(!c.filters_active());
        assert_eq!(c.sort(), SortMode::None);
        assert_eq!(c.view(), View::List);
        assert!(!c.is_comparing());
    }

    #[test]
    fn test_duplicate_content_is_appended_twice() {
        let mut c = CollectionController::new();
        assert!(c.add_result(result("1", "Jane", 7.0, "3 years", &[])));
        assert!(c.add_result(result("2", "Jane", 7.0, "3 years", &[])));
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn test_duplicate_id_is_refused() {
        let mut c = CollectionController::new();
        assert!(c.add_result(result("1", "Jane", 7.0, "", &[])));
        assert!(!c.add_result(result("1", "John", 5.0, "", &[])));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_filter_conjunction() {
        let mut c = seeded();
        c.set_filter(FilterCriteria {
            min_score: 5.0,
            min_experience: 4.0,
            skill: "Go".to_string(),
        });
        assert_eq!(visible_ids(&c), vec!["c"]);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_sort_by_score_is_stable_for_ties() {
        let mut c = CollectionController::new();
        c.add_result(result("x", "X", 6.0, "", &[]));
        c.add_result(result("y", "Y", 8.0, "", &[]));
        c.add_result(result("z", "Z", 6.0, "", &[]));
        c.add_result(result("w", "W", 8.0, "", &[]));

        c.set_sort(SortMode::Score);
        assert_eq!(visible_ids(&c), vec!["y", "w", "x", "z"]);

        c.set_sort(SortMode::None);
        assert_eq!(visible_ids(&c), vec!["x", "y", "z", "w"]);
    }

    #[test]
    fn test_filter_then_sort() {
        let mut c = seeded();
        c.set_filter(FilterCriteria {
            skill: "python".to_string(),
            ..Default::default()
        });
        c.set_sort(SortMode::Experience);
        assert_eq!(visible_ids(&c), vec!["c", "b"]);
    }

    #[test]
    fn test_selection_survives_hiding_filter() {
        let mut c = seeded();
        assert!(c.toggle_select("a"));

        c.set_filter(FilterCriteria {
            min_score: 5.0,
            ..Default::default()
        });
        assert!(!visible_ids(&c).contains(&"a".to_string()));
        assert!(c.is_selected("a"));

        c.reset_filters();
        assert!(c.is_selected("a"));
        assert!(visible_ids(&c).contains(&"a".to_string()));
    }

    #[test]
    fn test_expansion_is_independent_of_selection() {
        let mut c = seeded();
        c.toggle_expand("b");
        assert!(c.is_expanded("b"));
        assert!(!c.is_selected("b"));
        c.toggle_expand("b");
        assert!(!c.is_expanded("b"));
    }

    #[test]
    fn test_toggle_unknown_id_is_rejected() {
        let mut c = seeded();
        assert!(!c.toggle_select("nope"));
        assert!(!c.toggle_expand("nope"));
        assert!(c.selected().is_empty());
    }

    #[test]
    fn test_compare_gating_at_two() {
        let mut c = seeded();
        assert!(c.begin_comparison().is_none());

        c.toggle_select("c");
        assert!(!c.can_compare());
        assert!(c.begin_comparison().is_none());
        assert_eq!(c.view(), View::List);

        c.toggle_select("a");
        assert!(c.can_compare());
        assert!(c.begin_comparison().is_some());
        assert!(c.is_comparing());
        assert_eq!(c.view(), View::Comparison);
    }

    #[test]
    fn test_comparison_uses_sequence_order_not_selection_order() {
        let mut c = seeded();
        c.set_job_description("Go backend".to_string());
        c.toggle_select("c");
        c.toggle_select("a");

        let pending = c.begin_comparison().unwrap();
        let names: Vec<&str> = pending.candidates.iter().map(|r| r.candidate_name()).collect();
        assert_eq!(names, vec!["Ann", "Cat"]);
        assert_eq!(pending.job_description, "Go backend");
    }

    #[test]
    fn test_comparison_outcome_replaces_prior_insight() {
        let mut c = seeded();
        c.toggle_select("a");
        c.toggle_select("b");

        let first = c.begin_comparison().unwrap();
        assert!(c.finish_comparison(first.ticket, Ok(insight(&["Ann", "Ben"]))));
        assert_eq!(c.insight().unwrap().best_fit_candidate_name, "Ann");

        let second = c.begin_comparison().unwrap();
        assert!(c.insight().is_none());
        assert!(c.finish_comparison(
            second.ticket,
            Err(ScreeningError::TransportFailure("offline".to_string()))
        ));
        assert!(c.insight().is_none());
        assert_eq!(c.comparison_error(), Some("offline"));
    }

    #[test]
    fn test_stale_comparison_is_dropped() {
        let mut c = seeded();
        c.toggle_select("a");
        c.toggle_select("b");

        let old = c.begin_comparison().unwrap();
        let new = c.begin_comparison().unwrap();

        assert!(!c.finish_comparison(old.ticket, Ok(insight(&["Ann", "Ben"]))));
        assert!(c.is_comparing());
        assert!(c.finish_comparison(new.ticket, Ok(insight(&["Ben", "Ann"]))));
        assert_eq!(c.insight().unwrap().best_fit_candidate_name, "Ben");
    }

    #[test]
    fn test_clear_all_drops_in_flight_comparison() {
        let mut c = seeded();
        c.toggle_select("a");
        c.toggle_select("b");
        let pending = c.begin_comparison().unwrap();

        c.clear_all();

        assert!(!c.finish_comparison(pending.ticket, Ok(insight(&["Ann", "Ben"]))));
        assert!(c.insight().is_none());
    }

    #[test]
    fn test_close_comparison_discards_insight() {
        let mut c = seeded();
        c.toggle_select("a");
        c.toggle_select("b");
        let pending = c.begin_comparison().unwrap();
        c.finish_comparison(pending.ticket, Ok(insight(&["Ann", "Ben"])));

        c.close_comparison();

        assert_eq!(c.view(), View::List);
        assert!(c.insight().is_none());
        assert!(c.is_selected("a"));
    }

    #[test]
    fn test_failed_analysis_appends_nothing() {
        let mut c = seeded();
        c.begin_analysis();
        assert_eq!(c.analyses_in_flight(), 1);

        c.finish_analysis(&Err(ScreeningError::MalformedResponse(
            "try another file".to_string(),
        )));

        assert_eq!(c.len(), 3);
        assert_eq!(c.analyses_in_flight(), 0);
        assert_eq!(c.analysis_error(), Some("try another file"));

        c.dismiss_analysis_error();
        assert!(c.analysis_error().is_none());
    }

    #[test]
    fn test_analyses_resolve_in_any_order() {
        let mut c = CollectionController::new();
        c.begin_analysis();
        c.begin_analysis();
        assert_eq!(c.analyses_in_flight(), 2);

        c.finish_analysis(&Ok(result("second", "B", 5.0, "", &[])));
        c.finish_analysis(&Ok(result("first", "A", 5.0, "", &[])));

        assert_eq!(c.analyses_in_flight(), 0);
        let ids: Vec<&str> = c.results().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["second", "first"]);
    }

    #[test]
    fn test_new_analysis_clears_previous_error() {
        let mut c = CollectionController::new();
        c.begin_analysis();
        c.finish_analysis(&Err(ScreeningError::TransportFailure("x".to_string())));
        assert!(c.analysis_error().is_some());

        c.begin_analysis();
        assert!(c.analysis_error().is_none());
    }

    #[test]
    fn test_dismiss_comparison_error_keeps_view() {
        let mut c = seeded();
        c.toggle_select("a");
        c.toggle_select("b");
        let pending = c.begin_comparison().unwrap();
        c.finish_comparison(
            pending.ticket,
            Err(ScreeningError::MalformedResponse("bad".to_string())),
        );

        c.dismiss_comparison_error();

        assert!(c.comparison_error().is_none());
        assert_eq!(c.view(), View::Comparison);
    }

    #[test]
    fn test_snapshot_reports_visible_cards_and_counts() {
        let mut c = seeded();
        c.toggle_select("a");
        c.set_filter(FilterCriteria {
            skill: "py".to_string(),
            ..Default::default()
        });

        let snapshot = c.snapshot();
        assert_eq!(snapshot.total_count, 3);
        assert_eq!(snapshot.visible_count, 2);
        assert_eq!(snapshot.selected_count, 1);
        assert!(!snapshot.can_compare);
        assert!(snapshot.filters_active);
        assert_eq!(snapshot.candidates[1].matched_skills, vec!["Python"]);
        assert_eq!(snapshot.candidates[1].score_tier, ScoreTier::Strong);

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["comparison"]["status"], "idle");
        assert_eq!(value["candidates"][0]["candidateName"], "Ben");
        assert_eq!(value["candidates"][0]["experienceYears"], 5.0);
    }
}
