use std::path::Path;

use fluent_bundle::{FluentArgs, FluentBundle, FluentResource};
use unic_langid::LanguageIdentifier;

use crate::game::types::Choice;

const FALLBACK_LANG: &str = "en";
const SUPPORTED: [&str; 2] = ["de", "en"];

/// Translated UI strings backed by a Fluent bundle.
pub struct I18n {
    bundle: FluentBundle<FluentResource>,
    lang: String,
}

impl I18n {
    /// Load `<lang>.ftl` from `dir` for the system language, falling back to
    /// English and finally to an empty bundle that echoes message ids.
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        let wanted = pick_language(sys_locale::get_locale().as_deref());

        for lang in [wanted, FALLBACK_LANG] {
            let path = dir.join(format!("{lang}.ftl"));
            match std::fs::read_to_string(&path) {
                Ok(source) => {
                    if let Some(i18n) = Self::from_source(lang, source) {
                        return i18n;
                    }
                    log::warn!("could not parse {}", path.display());
                }
                Err(e) => log::warn!("could not read {}: {}", path.display(), e),
            }
        }
        Self::empty()
    }

    /// Build from FTL text already in memory.
    pub fn from_source(lang: &str, source: String) -> Option<Self> {
        let resource = FluentResource::try_new(source).ok()?;
        let langid: LanguageIdentifier = lang.parse().ok()?;
        let mut bundle = FluentBundle::new(vec![langid]);
        // GTK labels render the bidi isolation marks as boxes.
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).ok()?;
        Some(Self {
            bundle,
            lang: lang.to_string(),
        })
    }

    fn empty() -> Self {
        let langid = LanguageIdentifier::default();
        Self {
            bundle: FluentBundle::new(vec![langid]),
            lang: FALLBACK_LANG.to_string(),
        }
    }

    pub fn t(&self, id: &str) -> String {
        self.format(id, None)
    }

    pub fn t_args(&self, id: &str, args: &FluentArgs) -> String {
        self.format(id, Some(args))
    }

    /// Display name of a choice.
    pub fn choice(&self, choice: Choice) -> String {
        self.t(choice.message_id())
    }

    fn format(&self, id: &str, args: Option<&FluentArgs>) -> String {
        let Some(pattern) = self.bundle.get_message(id).and_then(|m| m.value()) else {
            return id.to_string();
        };
        let mut errors = vec![];
        let text = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            log::debug!("formatting {id} in {}: {:?}", self.lang, errors);
        }
        text.replace("\\n", "\n")
    }

    #[allow(dead_code)]
    pub fn current_language(&self) -> &str {
        &self.lang
    }
}

/// Map a system locale like `de-AT` to one of the bundled languages.
fn pick_language(locale: Option<&str>) -> &'static str {
    let locale = locale.unwrap_or(FALLBACK_LANG).to_lowercase();
    SUPPORTED
        .into_iter()
        .find(|lang| locale.starts_with(lang))
        .unwrap_or(FALLBACK_LANG)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FTL: &str = "\
choice-snake = Snake
round-counter = Round { $round } / 5
two-lines = first\\nsecond
";

    #[test]
    fn locale_prefix_selects_language() {
        assert_eq!(pick_language(Some("de-AT")), "de");
        assert_eq!(pick_language(Some("DE")), "de");
        assert_eq!(pick_language(Some("fr-FR")), "en");
        assert_eq!(pick_language(None), "en");
    }

    #[test]
    fn formats_messages_with_arguments() {
        let i18n = I18n::from_source("en", FTL.to_string()).unwrap();
        assert_eq!(i18n.choice(Choice::Snake), "Snake");

        let mut args = FluentArgs::new();
        args.set("round", 3);
        assert_eq!(i18n.t_args("round-counter", &args), "Round 3 / 5");
        assert_eq!(i18n.t("two-lines"), "first\nsecond");
    }

    #[test]
    fn unknown_ids_echo_back() {
        let i18n = I18n::from_source("en", FTL.to_string()).unwrap();
        assert_eq!(i18n.t("nope"), "nope");
        assert_eq!(I18n::empty().choice(Choice::Gun), "choice-gun");
    }

    #[test]
    fn bundled_translations_cover_the_same_ids() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("resources");
        let en = std::fs::read_to_string(dir.join("en.ftl")).unwrap();
        let de = std::fs::read_to_string(dir.join("de.ftl")).unwrap();
        let ids = |src: &str| -> Vec<String> {
            let mut ids: Vec<String> = src
                .lines()
                .filter(|l| !l.starts_with('#') && !l.starts_with(' '))
                .filter_map(|l| l.split_once(" =").map(|(id, _)| id.trim().to_string()))
                .collect();
            ids.sort();
            ids
        };
        assert_eq!(ids(&en), ids(&de));
        assert!(I18n::from_source("en", en).is_some());
        assert!(I18n::from_source("de", de).is_some());
    }
}
