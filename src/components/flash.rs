//! Auto-dismissal of flash message banners

use crate::dom::{Document, NodeId, Selector};
use crate::page::{TimerQueue, TimerTask};
use std::time::Duration;

pub const ALERT_CLASS: &str = "alert";

/// Schedule every banner present now for fading after `delay`
pub fn init<D: Document + ?Sized>(doc: &D, timers: &mut TimerQueue, delay: Duration) {
    for alert in doc.query_all(&Selector::class(ALERT_CLASS)) {
        timers.schedule(delay, TimerTask::FadeFlash(alert));
    }
}

/// Start the fade and schedule removal once it has run for `fade`
pub fn fade<D: Document + ?Sized>(
    doc: &mut D,
    timers: &mut TimerQueue,
    alert: NodeId,
    fade: Duration,
) {
    doc.set_style(alert, "opacity", "0");
    doc.set_style(alert, "transition", &format!("opacity {}s ease", fade.as_secs_f64()));
    timers.schedule(fade, TimerTask::RemoveFlash(alert));
}

pub fn remove<D: Document + ?Sized>(doc: &mut D, alert: NodeId) {
    doc.remove(alert);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    #[test]
    fn test_alerts_fade_then_go() {
        let mut doc = MemoryDocument::parse(
            r#"<body>
                <div class="alert alert-success" id="ok">Saved</div>
                <p class="alerts">x</p>
            </body>"#,
        );
        let alert = doc.element_by_id("ok").unwrap();
        let mut timers = TimerQueue::new();

        init(&doc, &mut timers, Duration::from_secs(5));
        assert_eq!(timers.pending(), 1);

        let task = timers.pop_due(Duration::from_secs(5)).unwrap();
        assert_eq!(task, TimerTask::FadeFlash(alert));
        fade(&mut doc, &mut timers, alert, Duration::from_millis(500));
        assert_eq!(doc.style(alert, "opacity").as_deref(), Some("0"));
        assert_eq!(doc.style(alert, "transition").as_deref(), Some("opacity 0.5s ease"));

        assert_eq!(timers.pop_due(Duration::from_millis(5499)), None);
        assert_eq!(
            timers.pop_due(Duration::from_millis(5500)),
            Some(TimerTask::RemoveFlash(alert))
        );
        remove(&mut doc, alert);
        assert!(doc.element_by_id("ok").is_none());
    }
}
