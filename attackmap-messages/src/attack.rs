use serde::{Deserialize, Serialize};

/// Kind of simulated attack, as named on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttackType {
    UdpFlood,
    SynFlood,
    HttpGet,
    DnsAmplification,
    /// Any type the color table does not know about.
    Other(String),
}

impl AttackType {
    pub fn name(&self) -> &str {
        match self {
            Self::UdpFlood => "UDP Flood",
            Self::SynFlood => "SYN Flood",
            Self::HttpGet => "HTTP GET",
            Self::DnsAmplification => "DNS Amplification",
            Self::Other(name) => name,
        }
    }

    /// Arc and feed color for this attack type. Unknown types are white.
    pub fn color(&self) -> HexColor {
        match self {
            Self::UdpFlood => HexColor("#FFA500"),
            Self::SynFlood => HexColor("#FF4500"),
            Self::HttpGet => HexColor("#1E90FF"),
            Self::DnsAmplification => HexColor("#DC143C"),
            Self::Other(_) => HexColor::DEFAULT,
        }
    }
}

impl From<String> for AttackType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "UDP Flood" => Self::UdpFlood,
            "SYN Flood" => Self::SynFlood,
            "HTTP GET" => Self::HttpGet,
            "DNS Amplification" => Self::DnsAmplification,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for AttackType {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<AttackType> for String {
    fn from(attack_type: AttackType) -> Self {
        match attack_type {
            AttackType::Other(name) => name,
            known => known.name().to_string(),
        }
    }
}

impl std::fmt::Display for AttackType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// `#RRGGBB` color taken from the closed attack color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor(&'static str);

impl HexColor {
    pub const DEFAULT: HexColor = HexColor("#FFFFFF");

    pub const fn as_str(self) -> &'static str {
        self.0
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&self.0[range], 16).unwrap_or(u8::MAX)
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// One end of an attack arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}

impl Endpoint {
    pub fn new(country: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            country: country.into(),
            lat,
            lng,
        }
    }
}

/// A single attack delivered by the feed.
///
/// The color is always derived from the type; a color supplied on the wire
/// is ignored. Events are never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireAttack", into = "WireAttack")]
pub struct AttackEvent {
    attack_type: AttackType,
    source: Endpoint,
    destination: Endpoint,
    color: HexColor,
}

impl AttackEvent {
    pub fn new(attack_type: AttackType, source: Endpoint, destination: Endpoint) -> Self {
        let color = attack_type.color();
        Self {
            attack_type,
            source,
            destination,
            color,
        }
    }

    pub fn attack_type(&self) -> &AttackType {
        &self.attack_type
    }

    pub fn source(&self) -> &Endpoint {
        &self.source
    }

    pub fn destination(&self) -> &Endpoint {
        &self.destination
    }

    pub fn color(&self) -> HexColor {
        self.color
    }

    /// Hover label for the arc, e.g. `SYN Flood from Russia to Japan`.
    pub fn label(&self) -> String {
        format!(
            "{} from {} to {}",
            self.attack_type, self.source.country, self.destination.country
        )
    }
}

#[derive(Clone, Serialize, Deserialize)]
struct WireAttack {
    #[serde(rename = "type")]
    attack_type: AttackType,
    source: Endpoint,
    destination: Endpoint,
}

impl From<WireAttack> for AttackEvent {
    fn from(wire: WireAttack) -> Self {
        AttackEvent::new(wire.attack_type, wire.source, wire.destination)
    }
}

impl From<AttackEvent> for WireAttack {
    fn from(event: AttackEvent) -> Self {
        Self {
            attack_type: event.attack_type,
            source: event.source,
            destination: event.destination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_is_derived_from_type() {
        let event = AttackEvent::new(
            AttackType::from("SYN Flood"),
            Endpoint::new("Russia", 61.5, 105.3),
            Endpoint::new("United States", 37.1, -95.7),
        );
        assert_eq!(event.color(), HexColor("#FF4500"));
        assert_eq!(event.label(), "SYN Flood from Russia to United States");
    }

    #[test]
    fn test_unknown_type_falls_back_to_white() {
        let attack_type = AttackType::from("Slowloris");
        assert_eq!(attack_type, AttackType::Other("Slowloris".to_string()));
        assert_eq!(attack_type.color(), HexColor::DEFAULT);
        assert_eq!(attack_type.to_string(), "Slowloris");
    }

    #[test]
    fn test_wire_color_is_ignored() {
        let json = r##"{
            "type": "HTTP GET",
            "source": {"country": "China", "lat": 35.8, "lng": 104.1},
            "destination": {"country": "Germany", "lat": 51.1, "lng": 10.4},
            "color": "#000000"
        }"##;
        let event: AttackEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.attack_type(), &AttackType::HttpGet);
        assert_eq!(event.color().as_str(), "#1E90FF");
        assert_eq!(event.destination().country, "Germany");
    }

    #[test]
    fn test_serializes_type_by_name() {
        let event = AttackEvent::new(
            AttackType::DnsAmplification,
            Endpoint::new("Iran", 32.4, 53.6),
            Endpoint::new("France", 46.2, 2.2),
        );
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "DNS Amplification");
        assert!(value.get("color").is_none());
    }

    #[test]
    fn test_hex_rgb() {
        assert_eq!(AttackType::UdpFlood.color().rgb(), (0xFF, 0xA5, 0x00));
        assert_eq!(HexColor::DEFAULT.rgb(), (255, 255, 255));
    }
}
