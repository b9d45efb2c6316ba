use crate::calendar::{PeriodCalendar, RosterPeriod};
use crate::config::EngineConfig;
use crate::leave;
use crate::model::Fleet;
use chrono::NaiveDate;

/// A prepared final-review reminder. Delivery (mail, dashboard) is out of
/// scope; only the renderable content is produced here.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub period_code: String,
    pub deadline: NaiveDate,
    pub pending: usize,
    pub content: String,
}

/// Customizes the rendered message (plain text, SMS, ...).
pub trait ReminderRenderer {
    fn render(&self, pending: usize, period: &RosterPeriod, deadline: NaiveDate) -> String;
}

/// Simple text template intended for a future mail gateway.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReminder;

impl ReminderRenderer for TextReminder {
    fn render(&self, pending: usize, period: &RosterPeriod, deadline: NaiveDate) -> String {
        format!(
            "Final review reminder\n\n{pending} request(s) are still pending for roster period {code}.\nThe submission deadline is {deadline}. Please resolve them before the period locks.\n",
            code = period.code,
        )
    }
}

/// Prepares the advisory final-review reminder, or `None` when it is not
/// due today. Fires when pending requests exist and the next submission
/// deadline is exactly `config.final_review_days` away.
pub fn prepare_final_review(
    fleet: &Fleet,
    calendar: &PeriodCalendar,
    config: &EngineConfig,
    today: NaiveDate,
    renderer: &dyn ReminderRenderer,
) -> Option<Reminder> {
    let pending = fleet.pending_requests().count();
    let (period, deadline) = calendar.next_deadline(&fleet.periods, today, config.status)?;
    if !leave::final_review_due(pending, today, deadline, config) {
        return None;
    }
    let content = renderer.render(pending, period, deadline);
    Some(Reminder {
        period_code: period.code.clone(),
        deadline,
        pending,
        content,
    })
}
