// src/scrape/urls.rs
//
// Page addresses per ocean. Each ocean is its own subdomain of `host`.

use crate::data::Ocean;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Urls {
    host: String,
}

impl Urls {
    pub fn new(host: &str) -> Self {
        Self { host: s!(host.trim().trim_matches('/')) }
    }

    fn base(&self, ocean: Ocean) -> String {
        s!("https://{}.{}", ocean, self.host)
    }

    pub fn island_list(&self, ocean: Ocean) -> String {
        join!(self.base(ocean), "/yoweb/island/info.wm?showAll=true")
    }

    pub fn island(&self, ocean: Ocean, id: u64) -> String {
        s!("{}/yoweb/island/info.wm?islandid={}", self.base(ocean), id)
    }

    pub fn tax_rates(&self, ocean: Ocean) -> String {
        join!(self.base(ocean), "/yoweb/econ/taxrates.wm")
    }

    pub fn crew_fame(&self, ocean: Ocean) -> String {
        join!(self.base(ocean), "/ratings/top_fame_97.html")
    }

    pub fn crew(&self, ocean: Ocean, id: u64) -> String {
        s!("{}/yoweb/crew/info.wm?crewid={}", self.base(ocean), id)
    }

    /// The trailing `classic=$classic` is what the site itself links to.
    pub fn crew_battle(&self, ocean: Ocean, id: u64) -> String {
        s!("{}/yoweb/crew/battleinfo.wm?crewid={}&classic=$classic", self.base(ocean), id)
    }

    pub fn flag_fame(&self, ocean: Ocean) -> String {
        join!(self.base(ocean), "/ratings/top_fame_112.html")
    }

    pub fn flag(&self, ocean: Ocean, id: u64) -> String {
        s!("{}/yoweb/flag/info.wm?flagid={}", self.base(ocean), id)
    }

    pub fn market(&self, ocean: Ocean) -> String {
        join!(self.base(ocean), "/yoweb/econ/buysell.wm")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses() {
        let urls = Urls::new("puzzlepirates.com");
        assert_eq!(
            urls.island(Ocean::Emerald, 17),
            "https://emerald.puzzlepirates.com/yoweb/island/info.wm?islandid=17"
        );
        assert_eq!(urls.crew_fame(Ocean::Obsidian), "https://obsidian.puzzlepirates.com/ratings/top_fame_97.html");
        assert_eq!(
            urls.crew_battle(Ocean::Meridian, 5000123),
            "https://meridian.puzzlepirates.com/yoweb/crew/battleinfo.wm?crewid=5000123&classic=$classic"
        );
        assert_eq!(urls.market(Ocean::Cerulean), "https://cerulean.puzzlepirates.com/yoweb/econ/buysell.wm");
    }

    #[test]
    fn host_is_configurable() {
        let urls = Urls::new("localhost:8080/");
        assert_eq!(urls.flag(Ocean::Emerald, 3), "https://emerald.localhost:8080/yoweb/flag/info.wm?flagid=3");
    }
}
