use proptest::prelude::*;
use qrforge::qr::classifier::{is_alphanumeric, is_numeric, ALPHANUMERIC_CHARSET};
use qrforge::qr::{
    capacity_for, classify, fits, required_version, select, AlphabetClass, ContentKind,
    ErrorCorrectionLevel, FieldSet, GenerationRequest, RequestValidator, Version,
};

fn any_level() -> impl Strategy<Value = ErrorCorrectionLevel> {
    prop::sample::select(ErrorCorrectionLevel::ALL.to_vec())
}

fn any_version() -> impl Strategy<Value = Version> {
    (1u8..=40).prop_map(Version::new)
}

fn alphanumeric_string() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(ALPHANUMERIC_CHARSET.chars().collect::<Vec<_>>()), 1..200)
        .prop_map(|chars| chars.into_iter().collect())
}

proptest! {
    #[test]
    fn capacity_grows_with_version(version in 1u8..40, level in any_level()) {
        let smaller = capacity_for(Version::new(version), level);
        let larger = capacity_for(Version::new(version + 1), level);
        for class in AlphabetClass::ALL {
            prop_assert!(larger.capacity_of(class) > smaller.capacity_of(class));
        }
    }

    #[test]
    fn stronger_levels_hold_less(version in any_version()) {
        let bytes: Vec<usize> = ErrorCorrectionLevel::ALL
            .iter()
            .map(|&level| capacity_for(version, level).capacity.byte)
            .collect();
        prop_assert!(bytes.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn classification_is_deterministic(payload in ".{0,64}") {
        prop_assert_eq!(classify(&payload), classify(&payload));
    }

    #[test]
    fn digit_strings_are_numeric(payload in "[0-9]{1,100}") {
        prop_assert!(is_numeric(&payload));
        prop_assert_eq!(classify(&payload), AlphabetClass::Numeric);
    }

    #[test]
    fn charset_strings_are_at_most_alphanumeric(payload in alphanumeric_string()) {
        prop_assert!(is_alphanumeric(&payload));
        prop_assert!(classify(&payload) <= AlphabetClass::Alphanumeric);
    }

    #[test]
    fn lowercase_letters_stay_alphanumeric(payload in "[a-z]{1,40}") {
        prop_assert_eq!(classify(&payload), AlphabetClass::Alphanumeric);
    }

    #[test]
    fn required_version_is_smallest_fit(payload in ".{1,600}", level in any_level()) {
        let selection = select(&payload, level);
        prop_assert_eq!(selection.version, required_version(&payload, level));
        if selection.fits {
            prop_assert!(fits(&payload, selection.version, level));
            if selection.version > Version::MIN {
                let below = Version::new(selection.version.value() - 1);
                prop_assert!(!fits(&payload, below, level));
            }
        }
    }

    #[test]
    fn validation_is_idempotent(text in "[ -~]{1,300}", level in any_level()) {
        let request = GenerationRequest::new(ContentKind::Text, FieldSet::new().with("text", text.as_str()))
            .with_level(level);
        let validator = RequestValidator::new();
        prop_assert_eq!(validator.validate(&request), validator.validate(&request));
    }

    #[test]
    fn accepted_tickets_fit_their_version(text in "[ -~]{1,300}", level in any_level()) {
        let request = GenerationRequest::new(ContentKind::Text, FieldSet::new().with("text", text.as_str()))
            .with_level(level);
        if let Ok(accepted) = RequestValidator::new().validate(&request) {
            let ticket = accepted.ticket();
            prop_assert!(fits(&ticket.payload, ticket.version, ticket.level));
        }
    }
}
