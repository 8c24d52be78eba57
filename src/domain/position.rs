//! Position state derived from the portfolio's asset holding.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exposure {
    Flat,
    Long,
    Short,
}

impl Exposure {
    pub fn of(asset_holding: f64) -> Self {
        if asset_holding > 0.0 {
            Exposure::Long
        } else if asset_holding < 0.0 {
            Exposure::Short
        } else {
            Exposure::Flat
        }
    }

    pub fn is_long(self) -> bool {
        self == Exposure::Long
    }

    pub fn is_short(self) -> bool {
        self == Exposure::Short
    }
}

/// Signed market value of a holding: negative while short.
pub fn holding_value(asset_holding: f64, price: f64) -> f64 {
    asset_holding * price
}
