//! Presence strings and the lookup seam for translating them.
//!
//! Every user-visible string is a [`Phrase`]. Its key is the English
//! template, so a [`Localizer`] that knows nothing still produces English.

use std::collections::HashMap;

/// One user-visible presence string and its parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase<'a> {
    InSystem(&'a str),
    FlyingNormalSpace,
    DockedAt(&'a str),
    LandedOn(&'a str),
    Jumping,
    JumpingTo(&'a str),
    PreparingSupercruise,
    Supercruising,
    ConnectingInterface,
    InMenus,
    FlyingNear(&'a str),
    Approaching(&'a str),
    FlyingAround(&'a str),
    InSrvShipInOrbit(&'a str),
    InSrv(&'a str),
    Commander(&'a str),
}

impl<'a> Phrase<'a> {
    /// Lookup key, which doubles as the English template.
    pub fn key(&self) -> &'static str {
        match self {
            Phrase::InSystem(_) => "In system {system}",
            Phrase::FlyingNormalSpace => "Flying in normal space",
            Phrase::DockedAt(_) => "Docked at {station}",
            Phrase::LandedOn(_) => "Landed on {body}",
            Phrase::Jumping => "Jumping",
            Phrase::JumpingTo(_) => "Jumping to system {system}",
            Phrase::PreparingSupercruise => "Preparing for supercruise",
            Phrase::Supercruising => "Supercruising",
            Phrase::ConnectingInterface => "Connecting CMDR Interface",
            Phrase::InMenus => "In menus",
            Phrase::FlyingNear(_) => "Flying near {station}",
            Phrase::Approaching(_) => "Approaching {body}",
            Phrase::FlyingAround(_) => "Flying around {body}",
            Phrase::InSrvShipInOrbit(_) => "In SRV on {body}, ship in orbit",
            Phrase::InSrv(_) => "In SRV on {body}",
            Phrase::Commander(_) => "CMDR {name}",
        }
    }

    /// The named placeholder and its value, if the phrase has one.
    pub fn param(&self) -> Option<(&'static str, &'a str)> {
        match *self {
            Phrase::InSystem(v) | Phrase::JumpingTo(v) => Some(("system", v)),
            Phrase::DockedAt(v) | Phrase::FlyingNear(v) => Some(("station", v)),
            Phrase::LandedOn(v)
            | Phrase::Approaching(v)
            | Phrase::FlyingAround(v)
            | Phrase::InSrvShipInOrbit(v)
            | Phrase::InSrv(v) => Some(("body", v)),
            Phrase::Commander(v) => Some(("name", v)),
            Phrase::FlyingNormalSpace
            | Phrase::Jumping
            | Phrase::PreparingSupercruise
            | Phrase::Supercruising
            | Phrase::ConnectingInterface
            | Phrase::InMenus => None,
        }
    }
}

/// String lookup collaborator.
pub trait Localizer: Send + Sync {
    /// Translated template for `key`, or `None` to fall back to the key.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// Uses the English keys as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct English;

impl Localizer for English {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Templates keyed by their English text.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Localizer for Catalog {
    fn lookup(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }
}

/// Render `phrase` through `localizer`.
pub fn render(localizer: &dyn Localizer, phrase: Phrase<'_>) -> String {
    let template = localizer
        .lookup(phrase.key())
        .unwrap_or_else(|| phrase.key().to_string());
    match phrase.param() {
        Some((name, value)) => template.replacen(&format!("{{{name}}}"), value, 1),
        None => template,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_renders_templates() {
        assert_eq!(render(&English, Phrase::InSystem("Sol")), "In system Sol");
        assert_eq!(
            render(&English, Phrase::InSrvShipInOrbit("Earth")),
            "In SRV on Earth, ship in orbit"
        );
        assert_eq!(render(&English, Phrase::Commander("Jameson")), "CMDR Jameson");
        assert_eq!(render(&English, Phrase::Supercruising), "Supercruising");
    }

    #[test]
    fn catalog_overrides_and_falls_back() {
        let catalog: Catalog = [
            ("In system {system}", "Im System {system}"),
            ("Supercruising", "Im Supercruise"),
        ]
        .into_iter()
        .collect();

        assert_eq!(render(&catalog, Phrase::InSystem("Sol")), "Im System Sol");
        assert_eq!(render(&catalog, Phrase::Supercruising), "Im Supercruise");
        assert_eq!(render(&catalog, Phrase::DockedAt("Daedalus")), "Docked at Daedalus");
    }

    #[test]
    fn values_are_not_reexpanded() {
        assert_eq!(
            render(&English, Phrase::DockedAt("{station}")),
            "Docked at {station}"
        );
    }

    #[test]
    fn catalog_overrides_listed_keys_only() {
        let catalog: Catalog = [("In menus", "Dans les menus")].into_iter().collect();
        assert_eq!(render(&catalog, Phrase::InMenus), "Dans les menus");
        assert_eq!(render(&catalog, Phrase::Supercruising), "Supercruising");
    }
}
