//! Chapter reader with bounded next/previous navigation.

use super::ScreenState;
use crate::api::ApiClient;
use crate::models::{ChapterContent, ChapterSummary, Novel};
use crate::notice::Notice;
use crate::progress::{ProgressReporter, ReportOutcome};
use tokio::task::JoinHandle;

/// Outcome of a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Load this chapter.
    Go(u32),
    /// Nothing to do (already there, or before the first chapter).
    Stay,
    /// Past the last known chapter.
    AtEnd(Notice),
}

/// Current position and the known chapter total.
///
/// A total of 0 means the server has not told us yet; forward navigation is
/// then unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterNavigator {
    current: u32,
    total: u32,
}

impl ChapterNavigator {
    /// Start at `current` (raised to 1) with a possibly unknown total.
    pub fn new(current: u32, total: u32) -> Self {
        Self {
            current: current.max(1),
            total,
        }
    }

    /// Chapter currently shown.
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Known total, 0 when unknown.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Record the total reported with a chapter. Zero is ignored.
    pub fn set_total(&mut self, total: u32) {
        if total > 0 {
            self.total = total;
        }
    }

    /// Whether a previous chapter exists.
    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    /// Whether a next chapter may exist.
    pub fn has_next(&self) -> bool {
        self.total == 0 || self.current < self.total
    }

    /// Resolve a relative move.
    pub fn offset(&self, delta: i64) -> Step {
        let target = i64::from(self.current) + delta;
        if delta < 0 && target < 1 {
            return Step::Stay;
        }
        if delta > 0 && self.total > 0 && target > i64::from(self.total) {
            return Step::AtEnd(Notice::info("You are at the last available chapter"));
        }
        match u32::try_from(target) {
            Ok(n) if n != self.current => Step::Go(n),
            _ => Step::Stay,
        }
    }

    /// Resolve a jump from the chapter list.
    pub fn jump(&self, number: u32) -> Step {
        if number == self.current || number < 1 {
            return Step::Stay;
        }
        if self.total > 0 && number > self.total {
            return Step::AtEnd(Notice::info("You are at the last available chapter"));
        }
        Step::Go(number)
    }

    fn move_to(&mut self, number: u32) {
        self.current = number;
    }
}

/// Reader controller for one novel.
pub struct Reader {
    novel: Novel,
    navigator: ChapterNavigator,
    chapter: ScreenState<ChapterContent>,
    reporter: ProgressReporter,
    last_report: Option<JoinHandle<ReportOutcome>>,
    ascending: bool,
}

impl Reader {
    /// Prepare a reader at `number`. Nothing is fetched until [`Reader::load`].
    pub fn new(api: &ApiClient, novel: Novel, number: u32) -> Self {
        let total = novel.chapter_count();
        Self {
            navigator: ChapterNavigator::new(number, total),
            novel,
            chapter: ScreenState::Loading,
            reporter: ProgressReporter::new(api.clone()),
            last_report: None,
            ascending: true,
        }
    }

    /// The novel being read.
    pub fn novel(&self) -> &Novel {
        &self.novel
    }

    /// Position and total.
    pub fn navigator(&self) -> &ChapterNavigator {
        &self.navigator
    }

    /// Current chapter state.
    pub fn chapter(&self) -> &ScreenState<ChapterContent> {
        &self.chapter
    }

    /// Paragraphs of the loaded chapter.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.chapter
            .data()
            .map(ChapterContent::paragraphs)
            .unwrap_or_default()
    }

    /// Fetch the current chapter and report view and progress.
    ///
    /// The returned handle resolves once both reports settle; dropping it
    /// does not cancel them.
    pub async fn load(&mut self, api: &ApiClient) -> Option<JoinHandle<ReportOutcome>> {
        let number = self.navigator.current();
        self.chapter = ScreenState::Loading;

        match api.chapter(&self.novel.id, number).await {
            Ok(chapter) => {
                if let Some(total) = chapter.total_chapters {
                    self.navigator.set_total(total);
                }
                let handle =
                    self.reporter
                        .spawn_report(self.novel.clone(), number, chapter.title.clone());
                self.chapter = ScreenState::Loaded(chapter);
                Some(handle)
            }
            Err(e) => {
                self.chapter = ScreenState::from_result(Err(e), "Failed to load chapter");
                None
            }
        }
    }

    /// Apply a navigation step, loading the target chapter.
    ///
    /// Returns the notice to show, if any. The report for the new chapter is
    /// kept until [`Reader::take_report`] collects it.
    pub async fn navigate(&mut self, api: &ApiClient, step: Step) -> Option<Notice> {
        match step {
            Step::Go(number) => {
                self.navigator.move_to(number);
                self.last_report = self.load(api).await;
                None
            }
            Step::Stay => None,
            Step::AtEnd(notice) => Some(notice),
        }
    }

    /// Next chapter.
    pub async fn next(&mut self, api: &ApiClient) -> Option<Notice> {
        let step = self.navigator.offset(1);
        self.navigate(api, step).await
    }

    /// Previous chapter. Silent at the first chapter.
    pub async fn prev(&mut self, api: &ApiClient) -> Option<Notice> {
        let step = self.navigator.offset(-1);
        self.navigate(api, step).await
    }

    /// Report handle of the chapter most recently opened by navigation.
    pub fn take_report(&mut self) -> Option<JoinHandle<ReportOutcome>> {
        self.last_report.take()
    }

    /// Flip the chapter list order.
    pub fn toggle_order(&mut self) {
        self.ascending = !self.ascending;
    }

    /// Chapter list in the current order.
    pub fn chapter_list(&self) -> Vec<&ChapterSummary> {
        let mut list: Vec<&ChapterSummary> = self.novel.chapters.iter().collect();
        list.sort_by_key(|c| c.number);
        if !self.ascending {
            list.reverse();
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prev_at_first_chapter_is_silent() {
        let nav = ChapterNavigator::new(1, 10);
        assert_eq!(nav.offset(-1), Step::Stay);
        assert!(!nav.has_prev());
    }

    #[test]
    fn test_next_at_last_chapter_yields_notice() {
        let nav = ChapterNavigator::new(10, 10);
        match nav.offset(1) {
            Step::AtEnd(notice) => assert!(!notice.is_error()),
            other => panic!("expected AtEnd, got {:?}", other),
        }
        assert!(!nav.has_next());
    }

    #[test]
    fn test_unknown_total_allows_forward() {
        let nav = ChapterNavigator::new(7, 0);
        assert_eq!(nav.offset(1), Step::Go(8));
        assert!(nav.has_next());
    }

    #[test]
    fn test_zero_total_does_not_erase_known_total() {
        let mut nav = ChapterNavigator::new(3, 12);
        nav.set_total(0);
        assert_eq!(nav.total(), 12);
        nav.set_total(15);
        assert_eq!(nav.total(), 15);
    }

    #[test]
    fn test_jump_bounds() {
        let nav = ChapterNavigator::new(3, 5);
        assert_eq!(nav.jump(3), Step::Stay);
        assert_eq!(nav.jump(0), Step::Stay);
        assert_eq!(nav.jump(5), Step::Go(5));
        assert!(matches!(nav.jump(6), Step::AtEnd(_)));
    }

    #[test]
    fn test_start_is_never_zero() {
        assert_eq!(ChapterNavigator::new(0, 4).current(), 1);
    }
}
