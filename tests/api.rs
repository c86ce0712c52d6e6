// Payload rules for the wordbook and settings endpoints, checked against the
// JSON bodies the server actually sends.

use words_rain::api::{
    self, Accent, Settings, decode_settings, decode_wordbook_list, decode_wordbook_words,
    encode_wordbook,
};
use words_rain::{ApiError, EngineError};

#[test]
fn wordbook_list_drops_hidden_and_blank_names() {
    let body = r#"{"wordbooks":["animals",".draft","  ","fruit "]}"#;
    assert_eq!(
        decode_wordbook_list(body).unwrap(),
        vec!["animals".to_string(), "fruit".to_string()]
    );
}

#[test]
fn wordbook_words_are_renormalized() {
    let body = r#"{"name":"animals","words":["Cat"," dog ","","  ","OWL"]}"#;
    let book = decode_wordbook_words(body).unwrap();
    assert_eq!(book.name, "animals");
    assert_eq!(book.words, vec!["cat", "dog", "owl"]);
}

#[test]
fn empty_wordbook_cannot_start_a_game() {
    let book = decode_wordbook_words(r#"{"name":"blank","words":[" "]}"#).unwrap();
    let mut engine = words_rain::Engine::new(
        words_rain::Capabilities::new(words_rain::MonospaceMeasure::default()),
        words_rain::Playfield::new(640.0, 480.0).unwrap(),
    );
    assert_eq!(
        engine.start(book.words, Default::default(), 0.0),
        Err(EngineError::EmptyWordList)
    );
}

#[test]
fn settings_tolerate_missing_fields() {
    let s = decode_settings("{}").unwrap();
    assert_eq!(s.accent(), Accent::EnUs);
    assert_eq!(s.wordbook(), None);

    let s = decode_settings(r#"{"accent":"en-GB","wordbook":"fruit"}"#).unwrap();
    assert_eq!(
        s,
        Settings {
            accent: "en-GB".into(),
            wordbook: "fruit".into(),
        }
    );
    assert_eq!(s.accent(), Accent::EnGb);
    assert_eq!(s.wordbook(), Some("fruit"));
}

#[test]
fn malformed_bodies_are_decode_errors() {
    assert!(matches!(
        decode_wordbook_list("<html>"),
        Err(ApiError::Decode(_))
    ));
    assert!(matches!(
        decode_settings(r#"{"accent": 3}"#),
        Err(ApiError::Decode(_))
    ));
}

#[test]
fn wordbook_request_is_trimmed_and_validated() {
    assert_eq!(
        encode_wordbook("  fruit ").unwrap(),
        r#"{"wordbook":"fruit"}"#
    );
    assert!(matches!(
        encode_wordbook("../secrets"),
        Err(ApiError::InvalidWordbookName(_))
    ));
}

#[test]
fn accents_round_trip_through_the_wire_codes() {
    for accent in Accent::ALL {
        assert_eq!(accent.code().parse::<Accent>().unwrap(), accent);
        let body = api::encode_accent(accent).unwrap();
        assert!(body.contains(accent.code()));
    }
    assert!(matches!(
        "en-AU".parse::<Accent>(),
        Err(ApiError::InvalidAccent(code)) if code == "en-AU"
    ));
}
