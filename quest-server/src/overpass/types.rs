//! Overpass wire types and their conversion to POIs and hotels.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::{GeoPoint, HotelKind};

/// Top-level Overpass JSON response.
#[derive(Debug, Clone, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// A node, way or relation. Nodes carry `lat`/`lon`; ways and relations
/// carry a `center` when the query asks for `out center`.
#[derive(Debug, Clone, Deserialize)]
pub struct Element {
    pub id: u64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

impl Element {
    pub fn name(&self) -> Option<&str> {
        self.tags
            .get("name")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
    }

    /// Element position, from its own coordinates or its center.
    pub fn location(&self) -> Option<GeoPoint> {
        let (lat, lng) = match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => (lat, lon),
            (_, _, Some(c)) => (c.lat, c.lon),
            _ => return None,
        };
        GeoPoint::new(lat, lng).ok()
    }
}

/// A named point of interest found by Overpass.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPoi {
    pub id: u64,
    pub location: GeoPoint,
    pub name: String,
    /// Most specific OSM feature value, e.g. `"castle"` or `"waterfall"`.
    pub kind: String,
    pub tags: BTreeMap<String, String>,
}

impl RawPoi {
    /// Street address from `addr:*` tags, if any.
    pub fn address(&self) -> Option<String> {
        let street = match (self.tags.get("addr:street"), self.tags.get("addr:housenumber")) {
            (Some(s), Some(n)) => Some(format!("{s} {n}")),
            (Some(s), None) => Some(s.clone()),
            _ => None,
        };
        let city = match (self.tags.get("addr:postcode"), self.tags.get("addr:city")) {
            (Some(p), Some(c)) => Some(format!("{p} {c}")),
            (None, Some(c)) => Some(c.clone()),
            _ => None,
        };
        match (street, city) {
            (Some(s), Some(c)) => Some(format!("{s}, {c}")),
            (s, c) => s.or(c),
        }
    }
}

/// Feature kind from tags, checked in order tourism, historic, natural,
/// amenity.
pub fn detect_kind(tags: &BTreeMap<String, String>) -> String {
    ["tourism", "historic", "natural", "amenity"]
        .iter()
        .find_map(|key| tags.get(*key))
        .cloned()
        .unwrap_or_else(|| "unknown".to_string())
}

impl RawPoi {
    /// Convert an element, dropping it when unnamed or unplaced.
    pub fn from_element(element: Element) -> Option<Self> {
        let name = element.name()?.to_string();
        let location = element.location()?;
        let kind = detect_kind(&element.tags);
        Some(Self {
            id: element.id,
            location,
            name,
            kind,
            tags: element.tags,
        })
    }
}

/// An accommodation found by Overpass, before pricing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawHotel {
    pub name: String,
    pub location: GeoPoint,
    pub kind: HotelKind,
    pub stars: Option<u8>,
}

impl RawHotel {
    pub fn from_element(element: &Element) -> Option<Self> {
        let name = element.name()?.to_string();
        let location = element.location()?;
        let kind = element
            .tags
            .get("tourism")
            .map(|t| HotelKind::from_tourism_tag(t))
            .unwrap_or(HotelKind::Hotel);
        let stars = element
            .tags
            .get("stars")
            .or_else(|| element.tags.get("star_rating"))
            .and_then(|s| parse_stars(s));
        Some(Self {
            name,
            location,
            kind,
            stars,
        })
    }
}

/// Leading integer of a star rating such as `"4"` or `"3S"`.
fn parse_stars(s: &str) -> Option<u8> {
    let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    digits.parse().ok().filter(|n| (1..=7).contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements(json: &str) -> Vec<Element> {
        serde_json::from_str::<OverpassResponse>(json).unwrap().elements
    }

    #[test]
    fn parses_nodes_and_ways() {
        let els = elements(
            r#"{"elements":[
                {"type":"node","id":1,"lat":47.5576,"lon":10.7498,
                 "tags":{"name":"Schloss Neuschwanstein","tourism":"attraction","historic":"castle"}},
                {"type":"way","id":2,"center":{"lat":50.9,"lon":14.07},
                 "tags":{"name":"Basteibrücke","historic":"monument"}},
                {"type":"node","id":3,"lat":48.0,"lon":11.0,"tags":{"amenity":"cafe"}},
                {"type":"way","id":4,"tags":{"name":"Nowhere"}}
            ]}"#,
        );
        let pois: Vec<RawPoi> = els.into_iter().filter_map(RawPoi::from_element).collect();
        assert_eq!(pois.len(), 2);
        assert_eq!(pois[0].name, "Schloss Neuschwanstein");
        assert_eq!(pois[0].kind, "attraction");
        assert_eq!(pois[1].location, GeoPoint::new(50.9, 14.07).unwrap());
        assert_eq!(pois[1].kind, "monument");
    }

    #[test]
    fn missing_elements_field() {
        assert!(elements("{}").is_empty());
    }

    #[test]
    fn kind_priority() {
        let mut tags = BTreeMap::new();
        tags.insert("amenity".to_string(), "restaurant".to_string());
        assert_eq!(detect_kind(&tags), "restaurant");
        tags.insert("natural".to_string(), "peak".to_string());
        assert_eq!(detect_kind(&tags), "peak");
        assert_eq!(detect_kind(&BTreeMap::new()), "unknown");
    }

    #[test]
    fn address_from_tags() {
        let els = elements(
            r#"{"elements":[{"id":1,"lat":48.0,"lon":11.0,"tags":{"name":"X",
                "addr:street":"Marienplatz","addr:housenumber":"8",
                "addr:postcode":"80331","addr:city":"München"}}]}"#,
        );
        let poi = RawPoi::from_element(els.into_iter().next().unwrap()).unwrap();
        assert_eq!(poi.address().as_deref(), Some("Marienplatz 8, 80331 München"));
    }

    #[test]
    fn hotels() {
        let els = elements(
            r#"{"elements":[
                {"id":1,"lat":48.1,"lon":11.5,"tags":{"name":"Hotel Adlon","tourism":"hotel","stars":"5"}},
                {"id":2,"lat":48.1,"lon":11.5,"tags":{"name":"Youth Hostel","tourism":"hostel"}},
                {"id":3,"lat":48.1,"lon":11.5,"tags":{"name":"Pension Ruh","tourism":"guest_house","stars":"3S"}}
            ]}"#,
        );
        let hotels: Vec<RawHotel> = els.iter().filter_map(RawHotel::from_element).collect();
        assert_eq!(hotels[0].kind, HotelKind::Hotel);
        assert_eq!(hotels[0].stars, Some(5));
        assert_eq!(hotels[1].kind, HotelKind::Hostel);
        assert_eq!(hotels[1].stars, None);
        assert_eq!(hotels[2].kind, HotelKind::GuestHouse);
        assert_eq!(hotels[2].stars, Some(3));
    }
}
