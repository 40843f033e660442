use swing_engine::{
    DrawList, EngineContext, Game, GameConfig, GameError, InputEvent, InputQueue, RenderContext,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    draw: DrawList,
    config: GameConfig,
    initialized: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        Self {
            ctx: EngineContext::from_config(&config),
            draw: DrawList::with_capacity(config.max_draw_commands),
            input: InputQueue::new(),
            game,
            config,
            initialized: false,
        }
    }

    /// Replace the game's config with one parsed from JSON. Only honored
    /// before `init`; a malformed document is logged and ignored.
    pub fn configure(&mut self, json: &str) {
        if self.initialized {
            log::warn!("config override ignored: game already initialized");
            return;
        }
        match GameConfig::from_json(json) {
            Ok(config) => {
                self.ctx = EngineContext::from_config(&config);
                self.draw = DrawList::with_capacity(config.max_draw_commands);
                self.config = config;
            }
            Err(err) => log::warn!("config override ignored: {}", err),
        }
    }

    /// Initialize the game. Call once after construction.
    /// On failure the runner stays uninitialized and every tick is a no-op.
    pub fn init(&mut self) -> Result<(), GameError> {
        if let Err(err) = self.game.init(&mut self.ctx) {
            log::error!("game init failed: {}", err);
            return Err(err);
        }
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: advance the clock, update the game (which runs its
    /// physics substeps), then rebuild the draw list.
    pub fn tick(&mut self, frame_ms: f64) {
        if !self.initialized || self.ctx.quit_requested() {
            return;
        }

        self.ctx.clear_frame_data();
        self.ctx.clock.advance(frame_ms);

        self.game.update(&mut self.ctx, &self.input);
        self.input.drain();

        self.draw.clear();
        let mut render_ctx = RenderContext {
            draw: &mut self.draw,
            engine: &self.ctx,
        };
        self.game.render(&mut render_ctx);
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.draw
    }

    pub fn should_quit(&self) -> bool {
        self.ctx.quit_requested()
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn lines_ptr(&self) -> *const f32 {
        self.draw.lines_ptr()
    }

    pub fn line_count(&self) -> u32 {
        self.draw.line_count()
    }

    pub fn quads_ptr(&self) -> *const f32 {
        self.draw.quads_ptr()
    }

    pub fn quad_count(&self) -> u32 {
        self.draw.quad_count()
    }

    pub fn images_ptr(&self) -> *const f32 {
        self.draw.images_ptr()
    }

    pub fn image_count(&self) -> u32 {
        self.draw.image_count()
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }
}
