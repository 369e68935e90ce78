//! Page routes and their URL-fragment encoding.
//!
//! Pages are addressed by `#/<pageId>` fragments, with dynamic pages
//! carrying prefixed ids (`deck-…`, `edit-template-…`). The enum gives that
//! stringly-typed encoding a parse/serialize pair; unrecognized fragments
//! fall back to the default tool.

use uuid::Uuid;

/// Which page or tool the app is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The dice roller (the default page).
    Dice,
    /// The standard card picker.
    Cards,
    /// The coin flipper.
    Coins,
    /// The tile picker.
    Tiles,
    /// The settings page.
    Settings,
    /// The new-deck builder.
    NewDeck,
    /// A custom deck's play view.
    DeckDetail(Uuid),
    /// A custom deck's editor.
    DeckEdit(Uuid),
    /// The new-template builder.
    NewTemplate,
    /// A template's detail view.
    TemplateDetail(Uuid),
    /// A template's editor.
    TemplateEdit(Uuid),
    /// A running template session.
    TemplateRun(Uuid),
}

impl Default for Route {
    fn default() -> Self {
        Self::Dice
    }
}

impl Route {
    /// Parse a `#/<pageId>` fragment. Anything unrecognized, including
    /// malformed dynamic ids, falls back to the default route.
    pub fn parse(fragment: &str) -> Self {
        let page = fragment
            .trim()
            .trim_start_matches('#')
            .trim_start_matches('/');
        match page {
            "dice" | "" => Route::Dice,
            "cards" => Route::Cards,
            "coins" => Route::Coins,
            "tiles" => Route::Tiles,
            "settings" => Route::Settings,
            "new-deck" => Route::NewDeck,
            "new-template" => Route::NewTemplate,
            other => Self::parse_dynamic(other).unwrap_or_default(),
        }
    }

    fn parse_dynamic(page: &str) -> Option<Self> {
        // Longer prefixes first: "edit-deck-" also starts with "deck-"
        // only in the other direction, but keep the order explicit.
        let prefixed = [
            ("edit-deck-", Route::DeckEdit as fn(Uuid) -> Route),
            ("edit-template-", Route::TemplateEdit),
            ("run-template-", Route::TemplateRun),
            ("deck-", Route::DeckDetail),
            ("template-", Route::TemplateDetail),
        ];
        for (prefix, make) in prefixed {
            if let Some(rest) = page.strip_prefix(prefix) {
                return Uuid::parse_str(rest).ok().map(make);
            }
        }
        None
    }

    /// Serialize back to a `#/<pageId>` fragment.
    pub fn fragment(&self) -> String {
        match self {
            Route::Dice => "#/dice".into(),
            Route::Cards => "#/cards".into(),
            Route::Coins => "#/coins".into(),
            Route::Tiles => "#/tiles".into(),
            Route::Settings => "#/settings".into(),
            Route::NewDeck => "#/new-deck".into(),
            Route::NewTemplate => "#/new-template".into(),
            Route::DeckDetail(id) => format!("#/deck-{id}"),
            Route::DeckEdit(id) => format!("#/edit-deck-{id}"),
            Route::TemplateDetail(id) => format!("#/template-{id}"),
            Route::TemplateEdit(id) => format!("#/edit-template-{id}"),
            Route::TemplateRun(id) => format!("#/run-template-{id}"),
        }
    }
}
