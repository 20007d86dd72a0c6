use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Largest value a minutes field can hold.
pub const MAX_MINUTES: u32 = 99;
/// Largest value a seconds field can hold after normalization.
pub const MAX_SECONDS: u32 = 59;
pub const MIN_REPETITIONS: u32 = 1;
pub const MAX_REPETITIONS: u32 = 20;

/// A `minutes:seconds` length, always normalized to `0..=99` / `0..=59`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawIntervalLength")]
pub struct IntervalLength {
    minutes: u32,
    seconds: u32,
}

/// Wire shape of [`IntervalLength`]; normalized on the way in.
#[derive(Deserialize)]
struct RawIntervalLength {
    minutes: i64,
    seconds: i64,
}

impl From<RawIntervalLength> for IntervalLength {
    fn from(raw: RawIntervalLength) -> Self {
        Self::new(raw.minutes, raw.seconds)
    }
}

impl IntervalLength {
    pub const ZERO: IntervalLength = IntervalLength {
        minutes: 0,
        seconds: 0,
    };

    /// Build a length from raw input, clamping and rolling seconds into
    /// minutes the same way the setters do.
    pub fn new(minutes: i64, seconds: i64) -> Self {
        Self::ZERO.with_minutes(minutes).with_seconds(seconds)
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn total_secs(&self) -> u64 {
        u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    pub fn is_zero(&self) -> bool {
        self.minutes == 0 && self.seconds == 0
    }

    /// Replace the minutes, clamped to `0..=99`.
    pub fn with_minutes(self, minutes: i64) -> Self {
        Self {
            minutes: clamp_field(minutes, MAX_MINUTES),
            ..self
        }
    }

    /// Replace the seconds. Values of 60 or more roll whole minutes into the
    /// minutes field, which stays capped at 99.
    pub fn with_seconds(self, seconds: i64) -> Self {
        let seconds = seconds.max(0) as u64;
        let carry = seconds / 60;
        let minutes = (u64::from(self.minutes) + carry).min(u64::from(MAX_MINUTES));
        Self {
            minutes: minutes as u32,
            seconds: (seconds % 60) as u32,
        }
    }

    /// One countdown step: seconds first, then borrow a minute.
    /// Returns `None` when already at `0:00`.
    pub(crate) fn decrement(self) -> Option<Self> {
        if self.seconds > 0 {
            Some(Self {
                seconds: self.seconds - 1,
                ..self
            })
        } else if self.minutes > 0 {
            Some(Self {
                minutes: self.minutes - 1,
                seconds: MAX_SECONDS,
            })
        } else {
            None
        }
    }
}

fn clamp_field(value: i64, max: u32) -> u32 {
    value.clamp(0, i64::from(max)) as u32
}

impl fmt::Display for IntervalLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

impl FromStr for IntervalLength {
    type Err = String;

    /// Accepts `M:SS`, `MM:SS` or a bare number of seconds.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once(':') {
            Some((m, sec)) => {
                let minutes: i64 = m
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid minutes in '{s}'"))?;
                let seconds: i64 = sec
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid seconds in '{s}'"))?;
                Ok(Self::new(minutes, seconds))
            }
            None => {
                let seconds: i64 = s
                    .parse()
                    .map_err(|_| format!("expected M:SS or seconds, got '{s}'"))?;
                Ok(Self::new(0, seconds))
            }
        }
    }
}

/// Display theme. Presentation only; the countdown never looks at it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    BlackWhite,
    WhiteBlack,
    NeonGreen,
    NeonRed,
    NeonPink,
}

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::BlackWhite,
        Theme::WhiteBlack,
        Theme::NeonGreen,
        Theme::NeonRed,
        Theme::NeonPink,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::BlackWhite => "black-white",
            Theme::WhiteBlack => "white-black",
            Theme::NeonGreen => "neon-green",
            Theme::NeonRed => "neon-red",
            Theme::NeonPink => "neon-pink",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown theme '{s}'"))
    }
}

/// User-editable workout settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTimerConfiguration")]
pub struct TimerConfiguration {
    pub work: IntervalLength,
    pub rest: IntervalLength,
    total_repetitions: u32,
    #[serde(default)]
    pub theme: Theme,
}

impl TimerConfiguration {
    pub fn new(work: IntervalLength, rest: IntervalLength, total_repetitions: i64) -> Self {
        Self {
            work,
            rest,
            total_repetitions: clamp_repetitions(total_repetitions),
            theme: Theme::default(),
        }
    }

    pub fn with_theme(self, theme: Theme) -> Self {
        Self { theme, ..self }
    }

    pub fn total_repetitions(&self) -> u32 {
        self.total_repetitions
    }

    pub(crate) fn set_total_repetitions(&mut self, value: i64) {
        self.total_repetitions = clamp_repetitions(value);
    }
}

#[derive(Deserialize)]
struct RawTimerConfiguration {
    work: IntervalLength,
    rest: IntervalLength,
    total_repetitions: i64,
    #[serde(default)]
    theme: Theme,
}

impl From<RawTimerConfiguration> for TimerConfiguration {
    fn from(raw: RawTimerConfiguration) -> Self {
        Self::new(raw.work, raw.rest, raw.total_repetitions).with_theme(raw.theme)
    }
}

impl Default for TimerConfiguration {
    /// 40 seconds of work, one minute of rest, three repetitions.
    fn default() -> Self {
        Self::new(IntervalLength::new(0, 40), IntervalLength::new(1, 0), 3)
    }
}

fn clamp_repetitions(value: i64) -> u32 {
    value.clamp(i64::from(MIN_REPETITIONS), i64::from(MAX_REPETITIONS)) as u32
}
