use ir_core::{EnglishNormalizer, Normalizer};

#[test]
fn it_lowercases_and_stems() {
    let words = EnglishNormalizer.normalize("Running Runners RUN! The cat's menu.");
    assert!(words.contains(&"run".to_string()));
    assert!(words.contains(&"the".to_string()));
    // apostrophes are stripped, not split on
    assert!(words.contains(&"cat".to_string()));
}

#[test]
fn it_keeps_stopwords_and_digits() {
    let words = EnglishNormalizer.normalize("The 1885 edition, and the map");
    assert_eq!(words.iter().filter(|w| *w == "the").count(), 2);
    assert!(words.contains(&"1885".to_string()));
    assert!(words.contains(&"and".to_string()));
}

#[test]
fn it_is_deterministic() {
    let text = "She-who-must-be-obeyed sat upon the throne";
    assert_eq!(EnglishNormalizer.normalize(text), EnglishNormalizer.normalize(text));
}
