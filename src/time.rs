use crate::config;

/// Named slices of the day, by start fraction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DayPhase {
    Dawn,
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPhase {
    pub fn label(self) -> &'static str {
        match self {
            DayPhase::Dawn => "Dawn",
            DayPhase::Morning => "Morning",
            DayPhase::Afternoon => "Afternoon",
            DayPhase::Evening => "Evening",
            DayPhase::Night => "Night",
        }
    }
}

/// Clock for the day/night cycle. `current` is seconds into the current day.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeState {
    pub current: f32,
    pub day: u32,
    pub day_length: f32,
    pub morning_start: f32,
    pub afternoon_start: f32,
    pub evening_start: f32,
    pub night_start: f32,
    pub is_night: bool,
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new(config::DAY_LENGTH)
    }
}

impl TimeState {
    pub fn new(day_length: f32) -> Self {
        let mut time = Self {
            current: config::DAY_START * day_length,
            day: 1,
            day_length,
            morning_start: config::MORNING_START,
            afternoon_start: config::AFTERNOON_START,
            evening_start: config::EVENING_START,
            night_start: config::NIGHT_START,
            is_night: false,
        };
        time.is_night = time.night_at(time.fraction());
        time
    }

    pub fn fraction(&self) -> f32 {
        if self.day_length > 0.0 {
            self.current / self.day_length
        } else {
            0.0
        }
    }

    fn night_at(&self, f: f32) -> bool {
        f >= self.night_start || f < self.morning_start
    }

    /// Advance the clock. Returns the new day number when the day rolled over.
    pub fn advance(&mut self, dt: f32) -> Option<u32> {
        self.current += dt;
        let mut new_day = None;
        if self.day_length > 0.0 {
            while self.current >= self.day_length {
                self.current -= self.day_length;
                self.day += 1;
                new_day = Some(self.day);
            }
        }
        self.is_night = self.night_at(self.fraction());
        new_day
    }

    /// Daylight for sun damage and shade regen: morning through the end of afternoon.
    pub fn sun_up(&self) -> bool {
        let f = self.fraction();
        f >= self.morning_start && f < self.evening_start
    }

    pub fn is_evening(&self) -> bool {
        let f = self.fraction();
        f >= self.evening_start && f < self.night_start
    }

    pub fn phase(&self) -> DayPhase {
        let f = self.fraction();
        if f >= self.night_start {
            DayPhase::Night
        } else if f >= self.evening_start {
            DayPhase::Evening
        } else if f >= self.afternoon_start {
            DayPhase::Afternoon
        } else if f >= self.morning_start {
            DayPhase::Morning
        } else {
            DayPhase::Dawn
        }
    }

    /// Clock reading on a 24-hour dial, as (hours, minutes).
    pub fn clock(&self) -> (u32, u32) {
        let minutes = (self.fraction() * 24.0 * 60.0) as u32;
        ((minutes / 60) % 24, minutes % 60)
    }
}
