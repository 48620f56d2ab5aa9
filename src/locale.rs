use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

pub const SUPPORTED_LOCALES: [&str; 3] = ["de", "it", "en"];
const FALLBACK_LOCALE: &str = "en";

// (key, [(locale, text)])
type Table = &'static [(&'static str, &'static [(&'static str, &'static str)])];

const MESSAGES: Table = &[
    (
        "unsupported_answer_type",
        &[
            ("en", "Unsupported answer type: {answer_type}"),
            ("de", "Nicht unterstuetzter Antworttyp: {answer_type}"),
            ("it", "Tipo di risposta non supportato: {answer_type}"),
        ],
    ),
    (
        "missing_answer",
        &[
            ("en", "Please provide an answer before submitting."),
            ("de", "Bitte gib eine Antwort ein, bevor du absendest."),
            ("it", "Inserisci una risposta prima di inviare."),
        ],
    ),
];

const UI_TEXTS: Table = &[
    (
        "submitted_answer",
        &[("en", "Submitted answer:"), ("de", "Abgegebene Antwort:"), ("it", "Risposta inviata:")],
    ),
    (
        "already_submitted_info",
        &[
            ("en", "You already submitted this poll."),
            ("de", "Du hast diese Umfrage bereits abgeschickt."),
            ("it", "Hai gia inviato questo sondaggio."),
        ],
    ),
    (
        "tap_one_option",
        &[("en", "Tap one option"), ("de", "Waehle eine Option"), ("it", "Scegli un'opzione")],
    ),
    (
        "choose_one_or_more_options",
        &[
            ("en", "Choose one or more options"),
            ("de", "Waehle eine oder mehrere Optionen"),
            ("it", "Scegli una o piu opzioni"),
        ],
    ),
    (
        "your_answer",
        &[("en", "Your answer"), ("de", "Deine Antwort"), ("it", "La tua risposta")],
    ),
    (
        "enter_text",
        &[("en", "Enter text"), ("de", "Text eingeben"), ("it", "Inserisci testo")],
    ),
    ("submit", &[("en", "Submit"), ("de", "Absenden"), ("it", "Invia")]),
    (
        "unsupported_answer_type",
        &[
            ("en", "Unsupported answer type:"),
            ("de", "Nicht unterstuetzter Antworttyp:"),
            ("it", "Tipo di risposta non supportato:"),
        ],
    ),
];

const FACILITATOR_TEXTS: Table = &[
    ("previous", &[("en", "Previous"), ("de", "Zurueck"), ("it", "Precedente")]),
    ("next", &[("en", "Next"), ("de", "Weiter"), ("it", "Successiva")]),
    (
        "prev_aria",
        &[("en", "Previous poll"), ("de", "Vorherige Umfrage"), ("it", "Sondaggio precedente")],
    ),
    (
        "next_aria",
        &[("en", "Next poll"), ("de", "Naechste Umfrage"), ("it", "Sondaggio successivo")],
    ),
    (
        "no_options",
        &[
            ("en", "No options configured."),
            ("de", "Keine Optionen konfiguriert."),
            ("it", "Nessuna opzione configurata."),
        ],
    ),
    (
        "no_text",
        &[
            ("en", "No text answers yet."),
            ("de", "Noch keine Textantworten."),
            ("it", "Ancora nessuna risposta testuale."),
        ],
    ),
    (
        "no_polls",
        &[
            ("en", "No polls found for this topic."),
            ("de", "Keine Umfragen fuer dieses Thema gefunden."),
            ("it", "Nessun sondaggio trovato per questo argomento."),
        ],
    ),
    ("response_one", &[("en", "response"), ("de", "Antwort"), ("it", "risposta")]),
    ("response_other", &[("en", "responses"), ("de", "Antworten"), ("it", "risposte")]),
    (
        "unsupported_poll_type",
        &[
            ("en", "Unsupported poll type."),
            ("de", "Nicht unterstuetzter Umfragetyp."),
            ("it", "Tipo di sondaggio non supportato."),
        ],
    ),
    (
        "failed_to_load",
        &[
            ("en", "Failed to load live results."),
            ("de", "Live-Ergebnisse konnten nicht geladen werden."),
            ("it", "Impossibile caricare i risultati live."),
        ],
    ),
];

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{([a-z_]+)\}").unwrap();
}

/// Maps a requested locale onto a supported one, defaulting to English.
pub fn normalize_language(language: Option<&str>) -> &'static str {
    language
        .map(str::to_lowercase)
        .and_then(|lowered| SUPPORTED_LOCALES.iter().copied().find(|locale| *locale == lowered))
        .unwrap_or(FALLBACK_LOCALE)
}

fn lookup(table: Table, key: &str, locale: &str) -> Option<&'static str> {
    let (_, variants) = table.iter().find(|(candidate, _)| *candidate == key)?;
    variants
        .iter()
        .find(|(candidate, _)| *candidate == locale)
        .or_else(|| variants.iter().find(|(candidate, _)| *candidate == FALLBACK_LOCALE))
        .map(|(_, text)| *text)
}

/// Localized message with `{name}` placeholders filled from `args`.
/// Unknown keys render as the key itself; unknown placeholders are left as is.
pub fn message(key: &str, locale: &str, args: &[(&str, &str)]) -> String {
    let template = lookup(MESSAGES, key, locale).unwrap_or(key);
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            args.iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn labels(table: Table, locale: &str) -> BTreeMap<&'static str, &'static str> {
    table
        .iter()
        .map(|(key, _)| (*key, lookup(table, key, locale).unwrap_or(*key)))
        .collect()
}

/// Every participant-facing label in one locale.
pub fn ui_texts(locale: &str) -> BTreeMap<&'static str, &'static str> {
    labels(UI_TEXTS, locale)
}

/// Labels of the facilitator's results screen in one locale.
pub fn facilitator_texts(locale: &str) -> BTreeMap<&'static str, &'static str> {
    labels(FACILITATOR_TEXTS, locale)
}
