use serde::{Deserialize, Serialize};
use spacefy_core::{compose, CalendarDate, Instant, WallClock};

/// Which of the four picker fields a selection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerTarget {
    CheckInDate,
    CheckOutDate,
    CheckInTime,
    CheckOutTime,
}

impl PickerTarget {
    pub fn wants_date(&self) -> bool {
        matches!(self, PickerTarget::CheckInDate | PickerTarget::CheckOutDate)
    }
}

/// A value produced by the date or time picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PickedValue {
    Date(CalendarDate),
    Time(WallClock),
}

/// The four user-selected values describing a prospective rental period.
///
/// Values are immutable: every selection produces a new window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookingWindow {
    pub check_in_date: Option<CalendarDate>,
    pub check_in_time: Option<WallClock>,
    pub check_out_date: Option<CalendarDate>,
    pub check_out_time: Option<WallClock>,
}

impl BookingWindow {
    /// A window with nothing picked yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All four fields seeded with `now`, as a freshly opened detail view shows them.
    pub fn seeded(now: Instant) -> Self {
        let date = CalendarDate::of(now);
        let time = WallClock::of(now);
        Self {
            check_in_date: Some(date),
            check_in_time: Some(time),
            check_out_date: Some(date),
            check_out_time: Some(time),
        }
    }

    pub fn from_parts(
        check_in_date: CalendarDate,
        check_in_time: WallClock,
        check_out_date: CalendarDate,
        check_out_time: WallClock,
    ) -> Self {
        Self {
            check_in_date: Some(check_in_date),
            check_in_time: Some(check_in_time),
            check_out_date: Some(check_out_date),
            check_out_time: Some(check_out_time),
        }
    }

    /// Returns the window with `value` written at `target`, or `None` when the
    /// value kind does not fit the target.
    pub fn with_value(&self, target: PickerTarget, value: PickedValue) -> Option<Self> {
        let mut next = *self;
        match (target, value) {
            (PickerTarget::CheckInDate, PickedValue::Date(d)) => next.check_in_date = Some(d),
            (PickerTarget::CheckOutDate, PickedValue::Date(d)) => next.check_out_date = Some(d),
            (PickerTarget::CheckInTime, PickedValue::Time(t)) => next.check_in_time = Some(t),
            (PickerTarget::CheckOutTime, PickedValue::Time(t)) => next.check_out_time = Some(t),
            _ => return None,
        }
        Some(next)
    }

    pub fn check_in(&self) -> Option<Instant> {
        Some(compose(self.check_in_date?, self.check_in_time?))
    }

    pub fn check_out(&self) -> Option<Instant> {
        Some(compose(self.check_out_date?, self.check_out_time?))
    }

    /// Both instants, once every field is picked.
    pub fn instants(&self) -> Option<(Instant, Instant)> {
        Some((self.check_in()?, self.check_out()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_window_is_zero_length() {
        let now = compose(CalendarDate::new(2024, 6, 1).unwrap(), WallClock::new(14, 7).unwrap())
            + chrono::Duration::seconds(31);
        let window = BookingWindow::seeded(now);
        let (check_in, check_out) = window.instants().unwrap();
        assert_eq!(check_in, check_out);
        assert_eq!(check_in.to_string(), "2024-06-01 14:07:00");
    }

    #[test]
    fn test_with_value_replaces_only_target() {
        let window = BookingWindow::empty();
        let date = CalendarDate::new(2024, 6, 2).unwrap();
        let next = window
            .with_value(PickerTarget::CheckOutDate, PickedValue::Date(date))
            .unwrap();
        assert_eq!(next.check_out_date, Some(date));
        assert_eq!(next.check_in_date, None);
        assert_eq!(window, BookingWindow::empty());
    }

    #[test]
    fn test_with_value_rejects_mismatched_kind() {
        let window = BookingWindow::empty();
        let time = WallClock::new(9, 0).unwrap();
        assert!(window
            .with_value(PickerTarget::CheckInDate, PickedValue::Time(time))
            .is_none());
    }

    #[test]
    fn test_partial_window_has_no_instants() {
        let window = BookingWindow {
            check_in_date: CalendarDate::new(2024, 6, 1),
            ..BookingWindow::empty()
        };
        assert!(window.check_in().is_none());
        assert!(window.instants().is_none());
    }

    #[test]
    fn test_picked_value_serde() {
        let value: PickedValue =
            serde_json::from_str(r#"{"kind":"time","value":"12:30"}"#).unwrap();
        assert_eq!(value, PickedValue::Time(WallClock::new(12, 30).unwrap()));
        let value: PickedValue =
            serde_json::from_str(r#"{"kind":"date","value":"2024-06-01"}"#).unwrap();
        assert_eq!(value, PickedValue::Date(CalendarDate::new(2024, 6, 1).unwrap()));
    }
}
