use crate::content::{ClockDef, ScheduleDef};

pub const MINUTES_PER_DAY: u32 = 24 * 60;
pub const TIME_BUCKET_MINUTES: u32 = 15;

/// One-shot schedule notifications. Each fires at most once per day,
/// keyed by the day it last fired, so a clock that is already past the
/// threshold when a day starts still fires exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleEvent {
    KeeperDeparted,
    KeeperReturned,
}

#[derive(Debug, Clone, Copy)]
pub struct GameClock {
    day: u32,
    minutes: f32,
    departure_fired_day: u32,
    return_fired_day: u32,
}

impl GameClock {
    pub fn new(day: u32, minute_of_day: u32) -> Self {
        Self {
            day,
            minutes: minute_of_day as f32,
            departure_fired_day: 0,
            return_fired_day: 0,
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn minute_of_day(&self) -> u32 {
        (self.minutes.floor() as u32) % MINUTES_PER_DAY
    }

    pub fn time_bucket(&self) -> u32 {
        self.minute_of_day() / TIME_BUCKET_MINUTES
    }

    pub fn advance(
        &mut self,
        dt_seconds: f32,
        clock: &ClockDef,
        schedule: &ScheduleDef,
    ) -> Vec<ScheduleEvent> {
        self.minutes += dt_seconds * clock.minutes_per_second;
        while self.minutes >= MINUTES_PER_DAY as f32 {
            self.minutes -= MINUTES_PER_DAY as f32;
            self.day += 1;
        }

        let minute = self.minute_of_day();
        let mut events = Vec::new();
        if minute >= schedule.departure_minute && self.departure_fired_day != self.day {
            self.departure_fired_day = self.day;
            events.push(ScheduleEvent::KeeperDeparted);
        }
        if minute >= schedule.return_minute && self.return_fired_day != self.day {
            self.return_fired_day = self.day;
            events.push(ScheduleEvent::KeeperReturned);
        }
        events
    }

    pub fn is_keeper_away(&self, schedule: &ScheduleDef) -> bool {
        let minute = self.minute_of_day();
        minute >= schedule.departure_minute && minute < schedule.return_minute
    }

    /// Punitive reset: skip forward to the wake minute of the next day.
    pub fn reset_to_next_morning(&mut self, wake_minute: u32) {
        self.day += 1;
        self.minutes = wake_minute as f32;
    }
}

pub fn format_clock(minute_of_day: u32) -> String {
    format!("{:02}:{:02}", minute_of_day / 60, minute_of_day % 60)
}
