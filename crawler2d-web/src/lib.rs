#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crawler2d::effects::{CrackFragment, DamageEvent, TextDamage, VhsOverlay, format_clock};
    use crawler2d::{
        Color, Creature, CreatureConfig, DrawCommand, DriverHandle, FrameDriver, GradientStop,
        Paint, Rect, RenderSink, Viewport,
    };
    use glam::Vec2;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

    const DEFAULT_CONFIG_URL: &str = "assets/creature.json";
    const CANVAS_ID: &str = "canvas";
    const FOOTER_ID: &str = "footer-text";
    const FRAGMENT_LIFETIME_MS: i32 = 800;
    /// Glyph rectangles are re-measured this often (in frames) besides on resize.
    const LAYOUT_REFRESH_FRAMES: u64 = 60;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("missing document"))?;

        let canvas: HtmlCanvasElement = element_by_id(&document, CANVAS_ID)?;

        spawn_local(async move {
            if let Err(e) = run(document, canvas).await {
                log::error!("crawler2d-web init failed: {e:?}");
            }
        });

        Ok(())
    }

    async fn run(document: web_sys::Document, canvas: HtmlCanvasElement) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        let viewport = window_viewport(&window)?;
        resize_canvas(&canvas, viewport);

        let config_url =
            query_param(&window, "config").unwrap_or_else(|| DEFAULT_CONFIG_URL.to_string());
        let config = match load_config(&config_url).await {
            Ok(config) => config,
            Err(e) => {
                log::warn!("using the default creature, failed to load {config_url}: {e:?}");
                CreatureConfig::default()
            }
        };

        let creature = Creature::new(config, viewport)
            .map_err(|e| JsValue::from_str(&format!("creature: {e}")))?;
        let seed = js_sys::Date::now() as u64;

        let mut driver = FrameDriver::new(creature);
        let vhs = Rc::new(RefCell::new(VhsOverlay::new(viewport, seed)));
        driver.add_observer(vhs.clone());

        let footer = match Footer::build(&document) {
            Ok(footer) => Some(footer),
            Err(e) => {
                log::warn!("text damage disabled: {e:?}");
                None
            }
        };
        let damage = footer.as_ref().map(|footer| {
            let damage = Rc::new(RefCell::new(TextDamage::new(seed.rotate_left(17))));
            footer.measure(&mut damage.borrow_mut());
            damage
        });
        if let Some(damage) = &damage {
            driver.add_observer(damage.clone());
        }

        let handle = driver.start();
        let state = Rc::new(RefCell::new(WebState {
            document: document.clone(),
            canvas,
            ctx,
            driver,
            handle,
            vhs,
            footer,
            damage,
            frames: 0,
        }));

        init_listeners(&window, &document, state.clone())?;

        let raf = Rc::new(RefCell::new(None::<Closure<dyn FnMut(f64)>>));
        let raf2 = raf.clone();
        *raf2.borrow_mut() = Some(Closure::wrap(Box::new(move |ts_ms: f64| {
            let running = match state.try_borrow_mut() {
                Ok(mut st) => st.render(ts_ms),
                Err(_) => true,
            };
            if !running {
                return;
            }

            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(callback) = raf.borrow().as_ref() {
                if let Err(e) = window.request_animation_frame(callback.as_ref().unchecked_ref())
                {
                    log::error!("requestAnimationFrame: {e:?}");
                }
            }
        }) as Box<dyn FnMut(f64)>));

        if let Some(callback) = raf2.borrow().as_ref() {
            window.request_animation_frame(callback.as_ref().unchecked_ref())?;
        }

        Ok(())
    }

    struct WebState {
        document: web_sys::Document,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        driver: FrameDriver,
        handle: DriverHandle,
        vhs: Rc<RefCell<VhsOverlay>>,
        footer: Option<Footer>,
        damage: Option<Rc<RefCell<TextDamage>>>,
        frames: u64,
    }

    impl WebState {
        /// Returns `false` once the driver has been stopped.
        fn render(&mut self, ts_ms: f64) -> bool {
            self.vhs.borrow_mut().set_clock_label(clock_label());

            if self.frames % LAYOUT_REFRESH_FRAMES == 0 {
                self.measure_footer();
            }
            self.frames += 1;

            let viewport = self.driver.creature().viewport();
            let Some(list) = self.driver.frame(ts_ms * 0.001) else {
                return false;
            };

            let dpr = device_pixel_ratio();
            let ctx = &self.ctx;
            let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
            ctx.clear_rect(
                0.0,
                0.0,
                f64::from(self.canvas.width()),
                f64::from(self.canvas.height()),
            );
            let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
            ctx.clear_rect(0.0, 0.0, f64::from(viewport.width), f64::from(viewport.height));
            list.replay(&mut CanvasSink { ctx });

            self.apply_damage();
            self.handle.is_running()
        }

        fn resize(&mut self, viewport: Viewport) {
            resize_canvas(&self.canvas, viewport);
            self.driver.creature_mut().resize(viewport);
            self.measure_footer();
        }

        fn measure_footer(&self) {
            if let (Some(footer), Some(damage)) = (&self.footer, &self.damage) {
                footer.measure(&mut damage.borrow_mut());
            }
        }

        fn apply_damage(&self) {
            let (Some(footer), Some(damage)) = (&self.footer, &self.damage) else {
                return;
            };
            let events: Vec<DamageEvent> = damage.borrow_mut().drain_events().collect();
            for event in events {
                if let Err(e) = footer.apply(&self.document, &event) {
                    log::warn!("text damage: {e:?}");
                }
            }
        }
    }

    /// The footer line, split into one span per glyph.
    struct Footer {
        container: HtmlElement,
        glyphs: Vec<HtmlElement>,
    }

    impl Footer {
        fn build(document: &web_sys::Document) -> Result<Self, JsValue> {
            let container: HtmlElement = element_by_id(document, FOOTER_ID)?;
            let text = container.text_content().unwrap_or_default();
            container.set_inner_html("");

            let mut glyphs = Vec::with_capacity(text.len());
            for ch in text.chars() {
                let span = document.create_element("span")?.dyn_into::<HtmlElement>()?;
                span.set_class_name("char");
                let shown = if ch == ' ' {
                    "\u{a0}".to_string()
                } else {
                    ch.to_string()
                };
                span.set_text_content(Some(&shown));
                let style = span.style();
                style.set_property("--crack-x", "0px")?;
                style.set_property("--crack-y", "0px")?;
                style.set_property("--crack-r", "0deg")?;
                container.append_child(&span)?;
                glyphs.push(span);
            }
            Ok(Self { container, glyphs })
        }

        fn measure(&self, damage: &mut TextDamage) {
            let block = dom_rect(&self.container);
            let glyphs = self.glyphs.iter().map(|span| dom_rect(span)).collect();
            damage.set_layout(block, glyphs);
        }

        fn apply(&self, document: &web_sys::Document, event: &DamageEvent) -> Result<(), JsValue> {
            match event {
                DamageEvent::Cracked {
                    index,
                    offset,
                    fragments,
                } => {
                    let Some(span) = self.glyphs.get(*index) else {
                        return Ok(());
                    };
                    let style = span.style();
                    style.set_property("--crack-x", &format!("{}px", offset.x))?;
                    style.set_property("--crack-y", &format!("{}px", offset.y))?;
                    style.set_property("--crack-r", &format!("{}deg", offset.rotation_deg))?;
                    span.class_list().remove_1("recovering")?;
                    span.class_list().add_1("cracked")?;
                    for fragment in fragments {
                        spawn_fragment(document, fragment)?;
                    }
                }
                DamageEvent::Recovering { index } => {
                    if let Some(span) = self.glyphs.get(*index) {
                        span.class_list().remove_1("cracked")?;
                        span.class_list().add_1("recovering")?;
                    }
                }
                DamageEvent::Settled { index } => {
                    if let Some(span) = self.glyphs.get(*index) {
                        span.class_list().remove_1("recovering")?;
                    }
                }
            }
            Ok(())
        }
    }

    fn spawn_fragment(
        document: &web_sys::Document,
        fragment: &CrackFragment,
    ) -> Result<(), JsValue> {
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("missing body"))?;
        let span = document.create_element("span")?.dyn_into::<HtmlElement>()?;
        span.set_class_name("crack-fragment");
        span.set_text_content(Some(&fragment.glyph.to_string()));
        let style = span.style();
        style.set_property("left", &format!("{}px", fragment.origin.x))?;
        style.set_property("top", &format!("{}px", fragment.origin.y))?;
        style.set_property("font-size", &format!("{}px", fragment.font_size_px))?;
        style.set_property("--frag-x", &format!("{}px", fragment.drift.x))?;
        style.set_property("--frag-y", &format!("{}px", fragment.drift.y))?;
        style.set_property("--frag-r", &format!("{}deg", fragment.spin_deg))?;
        body.append_child(&span)?;

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let remove = Closure::once_into_js(move || span.remove());
        window.set_timeout_with_callback_and_timeout_and_arguments_0(
            remove.unchecked_ref(),
            FRAGMENT_LIFETIME_MS,
        )?;
        Ok(())
    }

    fn init_listeners(
        window: &web_sys::Window,
        document: &web_sys::Document,
        state: Rc<RefCell<WebState>>,
    ) -> Result<(), JsValue> {
        {
            let state = state.clone();
            let closure = Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                let Ok(mut st) = state.try_borrow_mut() else {
                    return;
                };
                st.driver
                    .creature_mut()
                    .input_mut()
                    .pointer_moved(e.client_x() as f32, e.client_y() as f32);
            }) as Box<dyn FnMut(_)>);
            document
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let state = state.clone();
            let closure = Closure::wrap(Box::new(move |_e: web_sys::Event| {
                let Ok(mut st) = state.try_borrow_mut() else {
                    return;
                };
                st.driver.creature_mut().input_mut().pointer_left();
            }) as Box<dyn FnMut(_)>);
            document
                .add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let state = state.clone();
            let closure = Closure::wrap(Box::new(move |_e: web_sys::Event| {
                let Ok(mut st) = state.try_borrow_mut() else {
                    return;
                };
                st.driver.creature_mut().input_mut().pointer_entered();
            }) as Box<dyn FnMut(_)>);
            document
                .add_event_listener_with_callback("mouseenter", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let state = state.clone();
            let document_for_cb = document.clone();
            let closure = Closure::wrap(Box::new(move |_e: web_sys::Event| {
                let Ok(mut st) = state.try_borrow_mut() else {
                    return;
                };
                let visible = !document_for_cb.hidden();
                st.driver
                    .creature_mut()
                    .input_mut()
                    .set_page_visible(visible);
                if visible {
                    st.driver.resume_clock();
                }
            }) as Box<dyn FnMut(_)>);
            document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            )?;
            closure.forget();
        }

        {
            let state = state.clone();
            let closure = Closure::wrap(Box::new(move |_e: web_sys::Event| {
                let Some(window) = web_sys::window() else {
                    return;
                };
                let viewport = match window_viewport(&window) {
                    Ok(viewport) => viewport,
                    Err(e) => {
                        log::warn!("ignoring resize: {e:?}");
                        return;
                    }
                };
                let Ok(mut st) = state.try_borrow_mut() else {
                    return;
                };
                st.resize(viewport);
            }) as Box<dyn FnMut(_)>);
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::wrap(Box::new(move |_e: web_sys::Event| {
                let Ok(st) = state.try_borrow() else {
                    return;
                };
                st.handle.stop();
            }) as Box<dyn FnMut(_)>);
            window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Replays draw commands onto a Canvas2D context.
    struct CanvasSink<'a> {
        ctx: &'a CanvasRenderingContext2d,
    }

    impl RenderSink for CanvasSink<'_> {
        fn draw(&mut self, command: &DrawCommand) {
            if let Err(e) = self.try_draw(command) {
                log::debug!("canvas command failed: {e:?}");
            }
        }
    }

    impl CanvasSink<'_> {
        fn try_draw(&self, command: &DrawCommand) -> Result<(), JsValue> {
            let ctx = self.ctx;
            match command {
                DrawCommand::Save => ctx.save(),
                DrawCommand::Restore => ctx.restore(),
                DrawCommand::Translate(offset) => {
                    ctx.translate(f64::from(offset.x), f64::from(offset.y))?
                }
                DrawCommand::Rotate(angle) => ctx.rotate(f64::from(*angle))?,
                DrawCommand::FillEllipse {
                    center,
                    radii,
                    rotation,
                    paint,
                } => {
                    self.set_fill(paint)?;
                    ctx.begin_path();
                    ctx.ellipse(
                        f64::from(center.x),
                        f64::from(center.y),
                        f64::from(radii.x.abs()),
                        f64::from(radii.y.abs()),
                        f64::from(*rotation),
                        0.0,
                        std::f64::consts::TAU,
                    )?;
                    ctx.fill();
                }
                DrawCommand::FillCircle {
                    center,
                    radius,
                    paint,
                } => {
                    self.set_fill(paint)?;
                    ctx.begin_path();
                    ctx.arc(
                        f64::from(center.x),
                        f64::from(center.y),
                        f64::from(radius.abs()),
                        0.0,
                        std::f64::consts::TAU,
                    )?;
                    ctx.fill();
                }
                DrawCommand::FillRect {
                    origin,
                    size,
                    paint,
                } => {
                    self.set_fill(paint)?;
                    ctx.fill_rect(
                        f64::from(origin.x),
                        f64::from(origin.y),
                        f64::from(size.x),
                        f64::from(size.y),
                    );
                }
                DrawCommand::FillRoundRect {
                    origin,
                    size,
                    radius,
                    paint,
                } => {
                    self.set_fill(paint)?;
                    ctx.begin_path();
                    ctx.round_rect_with_f64(
                        f64::from(origin.x),
                        f64::from(origin.y),
                        f64::from(size.x),
                        f64::from(size.y),
                        f64::from(radius.max(0.0)),
                    )?;
                    ctx.fill();
                }
                DrawCommand::FillTriangle { points, paint } => {
                    self.set_fill(paint)?;
                    ctx.begin_path();
                    ctx.move_to(f64::from(points[0].x), f64::from(points[0].y));
                    ctx.line_to(f64::from(points[1].x), f64::from(points[1].y));
                    ctx.line_to(f64::from(points[2].x), f64::from(points[2].y));
                    ctx.close_path();
                    ctx.fill();
                }
                DrawCommand::StrokeQuadratic {
                    from,
                    control,
                    to,
                    color,
                    width,
                } => {
                    ctx.set_stroke_style_str(&css_color(*color));
                    ctx.set_line_width(f64::from(*width));
                    ctx.set_line_cap("round");
                    ctx.begin_path();
                    ctx.move_to(f64::from(from.x), f64::from(from.y));
                    ctx.quadratic_curve_to(
                        f64::from(control.x),
                        f64::from(control.y),
                        f64::from(to.x),
                        f64::from(to.y),
                    );
                    ctx.stroke();
                }
                DrawCommand::FillText {
                    position,
                    text,
                    size_px,
                    color,
                } => {
                    ctx.set_font(&format!("{size_px}px monospace"));
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill_text(text, f64::from(position.x), f64::from(position.y))?;
                }
            }
            Ok(())
        }

        fn set_fill(&self, paint: &Paint) -> Result<(), JsValue> {
            let ctx = self.ctx;
            match paint {
                Paint::Solid(color) => ctx.set_fill_style_str(&css_color(*color)),
                Paint::Linear { start, end, stops } => {
                    let gradient = ctx.create_linear_gradient(
                        f64::from(start.x),
                        f64::from(start.y),
                        f64::from(end.x),
                        f64::from(end.y),
                    );
                    add_stops(&gradient, stops)?;
                    ctx.set_fill_style_canvas_gradient(&gradient);
                }
                Paint::Radial {
                    inner_center,
                    inner_radius,
                    outer_center,
                    outer_radius,
                    stops,
                } => {
                    let gradient = ctx.create_radial_gradient(
                        f64::from(inner_center.x),
                        f64::from(inner_center.y),
                        f64::from(inner_radius.max(0.0)),
                        f64::from(outer_center.x),
                        f64::from(outer_center.y),
                        f64::from(outer_radius.max(0.0)),
                    )?;
                    add_stops(&gradient, stops)?;
                    ctx.set_fill_style_canvas_gradient(&gradient);
                }
            }
            Ok(())
        }
    }

    fn add_stops(gradient: &web_sys::CanvasGradient, stops: &[GradientStop]) -> Result<(), JsValue> {
        for stop in stops {
            gradient.add_color_stop(stop.offset.max(0.0).min(1.0), &css_color(stop.color))?;
        }
        Ok(())
    }

    fn css_color(color: Color) -> String {
        let [r, g, b] = color.to_rgb8();
        format!("rgba({r}, {g}, {b}, {})", color.a.max(0.0).min(1.0))
    }

    fn clock_label() -> String {
        let now = js_sys::Date::new_0();
        format_clock(now.get_hours(), now.get_minutes(), now.get_seconds())
    }

    fn dom_rect(element: &web_sys::Element) -> Rect {
        let rect = element.get_bounding_client_rect();
        Rect::new(
            Vec2::new(rect.left() as f32, rect.top() as f32),
            Vec2::new(rect.right() as f32, rect.bottom() as f32),
        )
    }

    fn device_pixel_ratio() -> f64 {
        web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0)
            .max(0.1)
    }

    fn window_viewport(window: &web_sys::Window) -> Result<Viewport, JsValue> {
        let width = window.inner_width()?.as_f64().unwrap_or(0.0);
        let height = window.inner_height()?.as_f64().unwrap_or(0.0);
        Viewport::new(width as f32, height as f32).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    // The simulation works in CSS pixels; the backing buffer is scaled by `devicePixelRatio`.
    fn resize_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) {
        let dpr = device_pixel_ratio();
        canvas.set_width((f64::from(viewport.width) * dpr).round().max(1.0) as u32);
        canvas.set_height((f64::from(viewport.height) * dpr).round().max(1.0) as u32);
        let style = canvas.style();
        let _ = style.set_property("width", &format!("{}px", viewport.width));
        let _ = style.set_property("height", &format!("{}px", viewport.height));
    }

    fn element_by_id<T: JsCast>(document: &web_sys::Document, id: &str) -> Result<T, JsValue> {
        let el = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))?;
        el.dyn_into::<T>()
            .map_err(|_| JsValue::from_str(&format!("element #{id} has unexpected type")))
    }

    fn query_param(window: &web_sys::Window, key: &str) -> Option<String> {
        let search = window.location().search().ok()?;
        let search = search.strip_prefix('?').unwrap_or(&search);
        if search.is_empty() {
            return None;
        }

        for part in search.split('&') {
            let (k, v) = part.split_once('=').unwrap_or((part, ""));
            if k != key {
                continue;
            }
            let v = v.replace('+', " ");
            if let Ok(decoded) = js_sys::decode_uri_component(&v) {
                if let Some(decoded) = decoded.as_string() {
                    return Some(decoded);
                }
            }
            return Some(v);
        }
        None
    }

    async fn load_config(url: &str) -> Result<CreatureConfig, JsValue> {
        let text = fetch_text(url).await?;
        CreatureConfig::from_json_str(&text).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    async fn fetch_text(path: &str) -> Result<String, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))?;
        let resp = JsFuture::from(window.fetch_with_str(path)).await?;
        let resp: web_sys::Response = resp.dyn_into()?;
        if !resp.ok() {
            return Err(JsValue::from_str(&format!(
                "GET {path} returned {}",
                resp.status()
            )));
        }
        let text = JsFuture::from(resp.text()?).await?;
        text.as_string()
            .ok_or_else(|| JsValue::from_str("response body is not text"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod web {
    // This crate is intended to be built via Trunk for `wasm32-unknown-unknown`.
    // Keep a tiny native stub so `cargo test` for the workspace stays green.
}
