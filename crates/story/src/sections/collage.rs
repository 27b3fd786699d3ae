const IMAGE_ENDPOINT: &str = "https://ik.imagekit.io/8qi5mzhkq";

pub const STEP_COUNT: usize = 5;

/// Seed for the published layout.
pub const COLLAGE_SEED: u64 = 0x2025_0910;

// Screenshot timestamps from 2025-09-12, HHMMSS.
const SHOTS: [&str; 75] = [
    "115735", "120125", "120150", "121600", "121635", "121746", "121944", "122053", "122227",
    "122352", "124457", "124601", "124726", "124830", "125957", "130127", "130208", "130312",
    "130358", "130456", "130602", "130637", "130728", "130816", "130937", "131015", "131149",
    "131210", "131239", "131521", "131535", "131637", "131734", "131815", "131855", "131931",
    "132015", "132258", "132730", "132805", "133132", "133232", "133323", "135812", "135920",
    "140142", "140233", "140326", "140407", "140455", "140545", "140624", "140758", "142655",
    "143104", "143445", "150302", "150650", "150936", "151430", "155602", "155934", "160504",
    "160637", "161347", "161524", "161823", "162213", "163422", "163636", "163823", "163903",
    "164220", "164824", "164959",
];

pub fn image_urls() -> Vec<String> {
    SHOTS
        .iter()
        .map(|t| format!("{IMAGE_ENDPOINT}/Screenshot%202025-09-12%20{t}.png"))
        .collect()
}

/// Small-screen variant served by the image CDN.
pub fn mobile_variant(url: &str) -> String {
    format!("{url}?tr=w-400,q-60")
}

#[cfg(test)]
mod tests {
    use super::{image_urls, mobile_variant};

    #[test]
    fn urls_are_unique_and_encoded() {
        let urls = image_urls();
        assert_eq!(urls.len(), 75);
        assert!(urls.iter().all(|u| !u.contains(' ')));
        let mut dedup = urls.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), urls.len());
        assert!(mobile_variant(&urls[0]).ends_with(".png?tr=w-400,q-60"));
    }
}
