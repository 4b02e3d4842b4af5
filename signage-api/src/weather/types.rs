use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const DEGRADED_ICON: &str = "cloud";
pub const SET_LOCATION: &str = "Set location";
pub const UNAVAILABLE: &str = "Unavailable";

/// The three representative hours of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Morning,
    Noon,
    Afternoon,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Morning, Slot::Noon, Slot::Afternoon];

    pub fn label(self) -> &'static str {
        match self {
            Slot::Morning => "Morning",
            Slot::Noon => "Noon",
            Slot::Afternoon => "Afternoon",
        }
    }

    /// Local hour whose forecast stands for this slot
    pub fn hour(self) -> u32 {
        match self {
            Slot::Morning => 9,
            Slot::Noon => 12,
            Slot::Afternoon => 15,
        }
    }
}

/// One slot as shown on the sign. This is also the stored format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeatherSlot {
    pub label: String,
    pub icon: String,
    pub summary: String,
    pub temp_f: Option<f64>,
}

impl WeatherSlot {
    pub fn degraded(slot: Slot, summary: &str) -> Self {
        WeatherSlot {
            label: slot.label().to_string(),
            icon: DEGRADED_ICON.to_string(),
            summary: summary.to_string(),
            temp_f: None,
        }
    }
}

/// Morning, noon and afternoon. A slot is `None` only when a stored row
/// carried no payload for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WeatherReport {
    pub morning: Option<WeatherSlot>,
    pub noon: Option<WeatherSlot>,
    pub afternoon: Option<WeatherSlot>,
}

impl WeatherReport {
    pub fn from_fn(mut f: impl FnMut(Slot) -> WeatherSlot) -> Self {
        WeatherReport {
            morning: Some(f(Slot::Morning)),
            noon: Some(f(Slot::Noon)),
            afternoon: Some(f(Slot::Afternoon)),
        }
    }

    /// Every slot showing `summary` with the generic icon and no temperature.
    pub fn degraded(summary: &str) -> Self {
        Self::from_fn(|slot| WeatherSlot::degraded(slot, summary))
    }

    pub fn slot(&self, slot: Slot) -> Option<&WeatherSlot> {
        match slot {
            Slot::Morning => self.morning.as_ref(),
            Slot::Noon => self.noon.as_ref(),
            Slot::Afternoon => self.afternoon.as_ref(),
        }
    }
}

/// A slot payload as found in the cache table. Rows written by older
/// deployments carry `temp_c` instead of `temp_f`.
///
/// `temp_f` must be present (it may be null) for a payload to count as
/// current; anything without it is tried as legacy.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StoredSlot {
    Current {
        label: String,
        icon: String,
        summary: String,
        #[serde(deserialize_with = "Option::deserialize")]
        temp_f: Option<f64>,
    },
    Legacy {
        label: String,
        icon: String,
        summary: String,
        #[serde(default)]
        temp_c: Option<f64>,
    },
}

impl From<StoredSlot> for WeatherSlot {
    fn from(stored: StoredSlot) -> Self {
        match stored {
            StoredSlot::Current {
                label,
                icon,
                summary,
                temp_f,
            } => WeatherSlot {
                label,
                icon,
                summary,
                temp_f,
            },
            StoredSlot::Legacy {
                label,
                icon,
                summary,
                temp_c,
            } => WeatherSlot {
                label,
                icon,
                summary,
                temp_f: temp_c.map(celsius_to_fahrenheit),
            },
        }
    }
}

/// Decodes one stored slot column. A missing column or a JSON `null` is an
/// empty slot.
pub fn decode_slot(column: Option<&str>) -> Result<Option<WeatherSlot>, serde_json::Error> {
    match column {
        None => Ok(None),
        Some(json) => {
            let stored: Option<StoredSlot> = serde_json::from_str(json)?;
            Ok(stored.map(WeatherSlot::from))
        }
    }
}

/// `c * 9/5 + 32`, rounded to one decimal place.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    ((celsius * 9.0 / 5.0 + 32.0) * 10.0).round() / 10.0
}
