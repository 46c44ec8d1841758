//! The administrative region searches are biased toward.

/// A target region: its full name, two-letter code, and advisory viewbox.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub code: String,
    /// ISO country code passed as `countrycodes`.
    pub country_code: String,
    /// `[west, south, east, north]` in decimal degrees.
    pub viewbox: [f64; 4],
}

impl Region {
    #[must_use]
    pub fn new_york() -> Self {
        Self {
            name: "New York".to_owned(),
            code: "NY".to_owned(),
            country_code: "us".to_owned(),
            viewbox: [-79.7624, 40.4774, -71.7517, 45.0153],
        }
    }

    /// Lower-cased substrings that mark a display label as inside the region.
    ///
    /// The code is matched when preceded by `", "` or `" "`, or followed by
    /// `","`. This over-matches on purpose: upstream address data is
    /// inconsistently populated, so a looser test rejects fewer real hits.
    #[must_use]
    pub fn label_markers(&self) -> [String; 4] {
        let name = self.name.to_lowercase();
        let code = self.code.to_lowercase();
        [
            name,
            format!(", {code}"),
            format!(" {code}"),
            format!("{code},"),
        ]
    }

    /// Nominatim `viewbox` parameter: `x1,y1,x2,y2`.
    #[must_use]
    pub fn viewbox_param(&self) -> String {
        let [west, south, east, north] = self.viewbox;
        format!("{west},{north},{east},{south}")
    }
}

impl Default for Region {
    fn default() -> Self {
        Self::new_york()
    }
}
