use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Debug, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize, Clone, Copy,
)]
pub enum MusicGenre {
    #[strum(serialize = "Pop")]
    #[serde(rename = "Pop")]
    Pop,
    #[strum(serialize = "Rock")]
    #[serde(rename = "Rock")]
    Rock,
    #[strum(serialize = "Hip-Hop")]
    #[serde(rename = "Hip-Hop")]
    HipHop,
    #[strum(serialize = "R&B")]
    #[serde(rename = "R&B")]
    RnB,
    #[strum(serialize = "Jazz")]
    #[serde(rename = "Jazz")]
    Jazz,
    #[strum(serialize = "Classical")]
    #[serde(rename = "Classical")]
    Classical,
    #[strum(serialize = "Electronic")]
    #[serde(rename = "Electronic")]
    Electronic,
    #[strum(serialize = "Country")]
    #[serde(rename = "Country")]
    Country,
    #[strum(serialize = "Blues")]
    #[serde(rename = "Blues")]
    Blues,
    #[strum(serialize = "Metal")]
    #[serde(rename = "Metal")]
    Metal,
    #[strum(serialize = "Folk")]
    #[serde(rename = "Folk")]
    Folk,
    #[strum(serialize = "Indie")]
    #[serde(rename = "Indie")]
    Indie,
    #[strum(serialize = "Other")]
    #[serde(rename = "Other")]
    Other,
}

impl MusicGenre {
    pub fn all_names() -> Vec<String> {
        use strum::IntoEnumIterator;
        Self::iter().map(|g| g.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_genre_display_and_parse_agree() {
        for name in MusicGenre::all_names() {
            let genre = MusicGenre::from_str(&name).unwrap();
            assert_eq!(genre.to_string(), name);
        }
        assert_eq!(MusicGenre::from_str("Hip-Hop").unwrap(), MusicGenre::HipHop);
        assert!(MusicGenre::from_str("hiphop").is_err());
    }

    #[test]
    fn test_genre_serde_uses_display_names() {
        let json = serde_json::to_string(&MusicGenre::RnB).unwrap();
        assert_eq!(json, "\"R&B\"");
    }
}
