//! Top-level application state: shared context plus the tab screens.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tm_core::{AppSettings, Route, SaveLibrary, TemplateLibrary, ToolStates};

use crate::store::AppStore;
use crate::tabs::cards::CardsTab;
use crate::tabs::coins::CoinsTab;
use crate::tabs::decks::DecksTab;
use crate::tabs::dice::DiceTab;
use crate::tabs::settings::SettingsTab;
use crate::tabs::templates::TemplatesTab;
use crate::tabs::tiles::TilesTab;
use crate::tabs::{InputMode, Tab, TabId};

/// Shared mutable state every tab operates on.
///
/// Libraries persist through the store on every mutation; the tool states
/// themselves live only in memory (and in saved-game snapshots), matching
/// how a physical table works: put it away and it resets.
pub struct AppContext {
    /// Live tool states (dice, cards, coins, tiles, custom decks).
    pub tools: ToolStates,
    /// User preferences.
    pub settings: AppSettings,
    /// Saved game snapshots.
    pub saves: SaveLibrary,
    /// Game templates.
    pub templates: TemplateLibrary,
    /// Persistence backend.
    pub store: AppStore,
    /// The one RNG every randomized operation draws from.
    pub rng: StdRng,
}

impl AppContext {
    /// Load persisted state from the store and build fresh tool states.
    pub fn load(store: AppStore, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut tools = ToolStates::new(&mut rng);
        tools.custom_decks = store.load_decks();
        Self {
            settings: store.load_settings(),
            saves: store.load_saves(),
            templates: store.load_templates(),
            tools,
            store,
            rng,
        }
    }

    /// Persist the settings blob.
    pub fn persist_settings(&mut self) {
        self.store.save_settings(&self.settings);
    }

    /// Persist the custom deck library.
    pub fn persist_decks(&mut self) {
        self.store.save_decks(&self.tools.custom_decks);
    }

    /// Persist the saved game library.
    pub fn persist_saves(&mut self) {
        self.store.save_saves(&self.saves);
    }

    /// Persist the template library.
    pub fn persist_templates(&mut self) {
        self.store.save_templates(&self.templates);
    }
}

/// Main application state for the TUI.
pub struct TuiApp {
    /// Shared state the tabs operate on.
    pub ctx: AppContext,
    /// Currently active tab.
    pub active_tab: TabId,
    /// Whether to show the global help popup.
    pub show_help: bool,
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Dice tray tab.
    pub dice: DiceTab,
    /// Card deck tab.
    pub cards: CardsTab,
    /// Coin flipper tab.
    pub coins: CoinsTab,
    /// Tile bag tab.
    pub tiles: TilesTab,
    /// Custom deck library tab.
    pub decks: DecksTab,
    /// Template library and runner tab.
    pub templates: TemplatesTab,
    /// Settings and saved games tab.
    pub settings: SettingsTab,
}

impl TuiApp {
    /// Create the app from loaded context, starting at a route.
    pub fn new(ctx: AppContext, route: Route) -> Self {
        let mut app = Self {
            ctx,
            active_tab: TabId::Dice,
            show_help: false,
            should_quit: false,
            dice: DiceTab::default(),
            cards: CardsTab::default(),
            coins: CoinsTab::default(),
            tiles: TilesTab::default(),
            decks: DecksTab::default(),
            templates: TemplatesTab::default(),
            settings: SettingsTab::default(),
        };
        app.open_route(route);
        app
    }

    /// Navigate to a route: pick the tab and forward any entity id.
    ///
    /// Stale ids degrade to the tab's default view rather than failing.
    pub fn open_route(&mut self, route: Route) {
        self.active_tab = match route {
            Route::Dice => TabId::Dice,
            Route::Cards => TabId::Cards,
            Route::Coins => TabId::Coins,
            Route::Tiles => TabId::Tiles,
            Route::Settings => TabId::Settings,
            Route::NewDeck => {
                self.decks.start_new_deck();
                TabId::Decks
            }
            Route::DeckDetail(id) | Route::DeckEdit(id) => {
                self.decks.open_deck(id, &self.ctx);
                TabId::Decks
            }
            Route::NewTemplate => {
                self.templates.start_new_template();
                TabId::Templates
            }
            Route::TemplateDetail(id) | Route::TemplateEdit(id) => {
                self.templates.open_template(id, &self.ctx);
                TabId::Templates
            }
            Route::TemplateRun(id) => {
                self.templates.start_setup(id, &self.ctx);
                TabId::Templates
            }
        };
    }

    /// Get the input mode of the currently active tab.
    pub fn active_input_mode(&self) -> InputMode {
        self.active_tab_ref().input_mode()
    }

    /// Get a reference to the active tab.
    pub fn active_tab_ref(&self) -> &dyn Tab {
        match self.active_tab {
            TabId::Dice => &self.dice,
            TabId::Cards => &self.cards,
            TabId::Coins => &self.coins,
            TabId::Tiles => &self.tiles,
            TabId::Decks => &self.decks,
            TabId::Templates => &self.templates,
            TabId::Settings => &self.settings,
        }
    }

    /// Forward a key event to the active tab with the shared context.
    pub fn forward_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        let ctx = &mut self.ctx;
        match self.active_tab {
            TabId::Dice => self.dice.handle_key(key, ctx),
            TabId::Cards => self.cards.handle_key(key, ctx),
            TabId::Coins => self.coins.handle_key(key, ctx),
            TabId::Tiles => self.tiles.handle_key(key, ctx),
            TabId::Decks => self.decks.handle_key(key, ctx),
            TabId::Templates => self.templates.handle_key(key, ctx),
            TabId::Settings => self.settings.handle_key(key, ctx),
        }
    }

    /// Switch to a tab by ID.
    pub fn switch_tab(&mut self, tab: TabId) {
        self.active_tab = tab;
    }
}
