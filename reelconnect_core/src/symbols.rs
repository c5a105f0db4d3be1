use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const CONNECT_SUFFIX: &str = "_connect";

/// Base symbols of the reel catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Symbol {
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    A,
    #[serde(rename = "BONUS")]
    Bonus,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    J,
    K,
    M1,
    M2,
    M3,
    M4,
    M5,
    M6,
    Q,
}

impl Symbol {
    pub const ALL: [Symbol; 19] = [
        Symbol::Nine,
        Symbol::Ten,
        Symbol::A,
        Symbol::Bonus,
        Symbol::H1,
        Symbol::H2,
        Symbol::H3,
        Symbol::H4,
        Symbol::H5,
        Symbol::H6,
        Symbol::J,
        Symbol::K,
        Symbol::M1,
        Symbol::M2,
        Symbol::M3,
        Symbol::M4,
        Symbol::M5,
        Symbol::M6,
        Symbol::Q,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn from_index(i: u8) -> Self {
        Self::ALL[i as usize % Self::COUNT]
    }

    pub fn to_index(self) -> u8 {
        // ALL is declared in variant order
        self as u8
    }

    pub fn asset_key(self) -> &'static str {
        match self {
            Symbol::Nine => "9",
            Symbol::Ten => "10",
            Symbol::A => "A",
            Symbol::Bonus => "BONUS",
            Symbol::H1 => "H1",
            Symbol::H2 => "H2",
            Symbol::H3 => "H3",
            Symbol::H4 => "H4",
            Symbol::H5 => "H5",
            Symbol::H6 => "H6",
            Symbol::J => "J",
            Symbol::K => "K",
            Symbol::M1 => "M1",
            Symbol::M2 => "M2",
            Symbol::M3 => "M3",
            Symbol::M4 => "M4",
            Symbol::M5 => "M5",
            Symbol::M6 => "M6",
            Symbol::Q => "Q",
        }
    }

    pub fn has_connected_form(self) -> bool {
        !matches!(self, Symbol::Bonus)
    }

    /// The highlighted variant shown after this symbol took part in a match.
    pub fn connected_form(self) -> Option<DisplaySymbol> {
        self.has_connected_form().then_some(DisplaySymbol {
            symbol: self,
            form: SymbolForm::Connected,
        })
    }

    pub fn base_form(self) -> DisplaySymbol {
        DisplaySymbol {
            symbol: self,
            form: SymbolForm::Base,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.asset_key())
    }
}

impl FromStr for Symbol {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|sym| sym.asset_key() == s)
            .ok_or_else(|| CoreError::UnknownSymbol(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum SymbolForm {
    #[default]
    Base,
    Connected,
}

/// What a cell currently shows: a base symbol in one of its display forms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DisplaySymbol {
    pub symbol: Symbol,
    pub form: SymbolForm,
}

impl DisplaySymbol {
    pub fn asset_key(&self) -> String {
        match self.form {
            SymbolForm::Base => self.symbol.asset_key().to_string(),
            SymbolForm::Connected => format!("{}{}", self.symbol.asset_key(), CONNECT_SUFFIX),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.form == SymbolForm::Connected
    }
}

impl From<Symbol> for DisplaySymbol {
    fn from(symbol: Symbol) -> Self {
        symbol.base_form()
    }
}

impl fmt::Display for DisplaySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.asset_key())
    }
}

impl FromStr for DisplaySymbol {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_suffix(CONNECT_SUFFIX) {
            Some(base) => {
                let symbol: Symbol = base.parse()?;
                symbol
                    .connected_form()
                    .ok_or_else(|| CoreError::UnknownSymbol(s.to_string()))
            }
            None => Ok(s.parse::<Symbol>()?.base_form()),
        }
    }
}

/// Every asset key in the catalog, base forms first, in catalog order.
pub fn asset_catalog() -> Vec<String> {
    let mut keys: Vec<String> = Symbol::ALL.iter().map(|s| s.asset_key().to_string()).collect();
    keys.extend(
        Symbol::ALL
            .iter()
            .filter_map(|s| s.connected_form())
            .map(|d| d.asset_key()),
    );
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_roundtrip_follows_catalog_order() {
        for (i, sym) in Symbol::ALL.iter().enumerate() {
            assert_eq!(sym.to_index() as usize, i);
            assert_eq!(Symbol::from_index(i as u8), *sym);
        }
        assert_eq!(Symbol::from_index(Symbol::COUNT as u8), Symbol::Nine);
    }

    #[test]
    fn test_connected_form_asset_key() {
        let connected = Symbol::H3.connected_form().unwrap();
        assert_eq!(connected.asset_key(), "H3_connect");
        assert!(connected.is_connected());
        assert_eq!(Symbol::Ten.base_form().asset_key(), "10");
    }

    #[test]
    fn test_bonus_has_no_connected_form() {
        assert!(Symbol::Bonus.connected_form().is_none());
        assert!("BONUS_connect".parse::<DisplaySymbol>().is_err());
    }

    #[test]
    fn test_parse_display_symbol() {
        let d: DisplaySymbol = "K_connect".parse().unwrap();
        assert_eq!(d.symbol, Symbol::K);
        assert_eq!(d.form, SymbolForm::Connected);
        let d: DisplaySymbol = "9".parse().unwrap();
        assert_eq!(d, Symbol::Nine.base_form());
        assert!(matches!(
            "Z".parse::<Symbol>(),
            Err(CoreError::UnknownSymbol(key)) if key == "Z"
        ));
    }

    #[test]
    fn test_serde_uses_asset_keys() {
        assert_eq!(serde_json::to_string(&Symbol::Nine).unwrap(), "\"9\"");
        assert_eq!(serde_json::to_string(&Symbol::Bonus).unwrap(), "\"BONUS\"");
        let sym: Symbol = serde_json::from_str("\"M4\"").unwrap();
        assert_eq!(sym, Symbol::M4);
    }

    #[test]
    fn test_asset_catalog_size() {
        let catalog = asset_catalog();
        // 19 base symbols, all but BONUS carry a connected variant
        assert_eq!(catalog.len(), 19 + 18);
        assert!(catalog.contains(&"Q_connect".to_string()));
        assert!(!catalog.contains(&"BONUS_connect".to_string()));
    }
}
