use super::{BloomConfig, BloomFilter};

const WORDS_PRESENT: &[&str] = &[
    "abound", "abounds", "abundance", "abundant", "accessible", "bloom", "blossom", "bolster",
    "bonny", "bonus", "bonuses", "coherent", "cohesive", "colorful", "comely", "comfort", "gems",
    "generosity", "generous", "generously", "genial",
];

const WORDS_ABSENT: &[&str] = &[
    "bluff",
    "cheater",
    "hate",
    "war",
    "humanity",
    "racism",
    "hurt",
    "nuke",
    "gloomy",
    "facebook",
    "geeksforgeeks",
    "twitter",
];

#[test]
fn present_words_always_found_with_tiny_false_positive_rate() {
    let n = WORDS_PRESENT.len() as u64;
    let config = BloomConfig::new()
        .with_n(n)
        .with_p(10e-100)
        .with_calculated_m()
        .with_k(4);
    let mut bf = BloomFilter::new(config);

    for word in WORDS_PRESENT {
        bf.insert(word.as_bytes());
    }

    // No false negatives are possible; absent words should (almost) never
    // collide given the tiny configured false-positive rate.
    for word in WORDS_ABSENT {
        assert!(!bf.lookup(word.as_bytes()), "unexpected collision for {word}");
    }

    for word in WORDS_PRESENT {
        assert!(bf.lookup(word.as_bytes()));
    }
}

#[test]
fn manual_parameters_are_preserved() {
    let config = BloomConfig::new().with_n(100).with_p(10e-100).with_m(1000).with_k(4);
    assert_eq!(config.n, 100);
    assert!((config.p - 10e-100).abs() < f64::EPSILON);
    assert_eq!(config.m, 1000);
    assert_eq!(config.k, 4);
}

#[test]
fn calculated_m_yields_low_false_positive_rate() {
    let config = BloomConfig::new().with_n(100).with_p(10e-100).with_calculated_m().with_k(4);
    assert_eq!(config.n, 100);
    assert!(config.m > 0);
    let bf = BloomFilter::new(config);
    assert!(bf.false_positive() <= 0.1);
}

#[test]
fn calculated_k_yields_low_false_positive_rate() {
    let config = BloomConfig::new().with_n(100).with_p(10e-100).with_m(1000).with_calculated_k();
    assert_eq!(config.m, 1000);
    assert!(config.k > 0);
    let bf = BloomFilter::new(config);
    assert!(bf.false_positive() <= 0.1);
}

#[test]
#[should_panic(expected = "n (expected elements) cannot be empty")]
fn with_calculated_m_requires_n() {
    let _ = BloomConfig::new().with_p(0.01).with_calculated_m();
}

#[test]
fn with_capacity_builds_usable_filter() {
    let mut bf = BloomFilter::with_capacity(1000, 0.01);
    bf.insert(b"key-1");
    assert!(bf.lookup(b"key-1"));
}
