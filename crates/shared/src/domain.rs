use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(SpringId);
id_newtype!(HotspotId);

/// Point on the viewport in percent, `0.0..=100.0` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_normalized(&self) -> bool {
        (0.0..=100.0).contains(&self.x) && (0.0..=100.0).contains(&self.y)
    }

    /// Same point as a `0.0..=1.0` fraction of the viewport.
    pub fn to_fraction(self) -> (f32, f32) {
        (self.x / 100.0, self.y / 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub id: HotspotId,
    pub name: String,
    pub position: Position,
    pub info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpringRecord {
    pub id: SpringId,
    pub name: String,
    pub location: String,
    pub description: String,
    pub history: String,
    pub legend: String,
    pub temperature: String,
    pub depth: String,
    pub flow: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub image: String,
    pub ar_model: String,
    pub audio_guide: String,
    pub coordinates: Position,
    #[serde(default)]
    pub hotspots: Vec<Hotspot>,
}

impl SpringRecord {
    pub fn hotspot(&self, id: &HotspotId) -> Option<&Hotspot> {
        self.hotspots.iter().find(|hotspot| &hotspot.id == id)
    }

    pub fn has_hotspot(&self, id: &HotspotId) -> bool {
        self.hotspot(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_bounds_are_inclusive() {
        assert!(Position::new(0.0, 100.0).is_normalized());
        assert!(!Position::new(-0.5, 50.0).is_normalized());
        assert!(!Position::new(50.0, 100.5).is_normalized());
        assert_eq!(Position::new(45.0, 55.0).to_fraction(), (0.45, 0.55));
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = HotspotId::new("main-spring");
        assert_eq!(
            serde_json::to_string(&id).expect("serialize"),
            "\"main-spring\""
        );
        assert_eq!(id.to_string(), "main-spring");
    }

    #[test]
    fn record_deserializes_with_missing_optional_lists() {
        let record: SpringRecord = serde_json::from_str(
            r#"{
                "id": "test",
                "name": "Test Spring",
                "location": "somewhere",
                "description": "d",
                "history": "h",
                "legend": "l",
                "temperature": "18°C",
                "depth": "1m",
                "flow": "1",
                "image": "img.jpg",
                "ar_model": "/models/test.glb",
                "audio_guide": "/audio/test.mp3",
                "coordinates": { "x": 10.0, "y": 20.0 }
            }"#,
        )
        .expect("deserialize");

        assert!(record.features.is_empty());
        assert!(record.hotspots.is_empty());
        assert!(!record.has_hotspot(&HotspotId::new("missing")));
    }
}
