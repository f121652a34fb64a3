use easel_core::{
    AppBuilder, CanvasApp, CapabilitySet, DecoderLoader, Embed, EmbedCapability, EmbedError,
    EmbedParams, EngineError, EngineOptions, Project, ProjectLayer, Rgb, StatusSink, Vec2,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct AppState {
    attached: bool,
    brush_size: f64,
    brush_opacity: f64,
    brush_scatter: f64,
    strokes: Vec<Vec<Vec2>>,
    clear_count: u32,
    tool_panel_hidden: bool,
    project: Option<Project>,
}

struct FakeApp {
    capabilities: CapabilitySet,
    state: Rc<RefCell<AppState>>,
}

impl CanvasApp for FakeApp {
    fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    fn attach_to_host(&mut self) -> Result<(), EngineError> {
        self.state.borrow_mut().attached = true;
        Ok(())
    }

    fn export_png(&self) -> Result<Vec<u8>, EngineError> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    fn export_psd(&self) -> Result<Vec<u8>, EngineError> {
        Ok(b"8BPS".to_vec())
    }

    fn set_brush_size(&mut self, size: f64) {
        self.state.borrow_mut().brush_size = size;
    }

    fn brush_size(&self) -> f64 {
        self.state.borrow().brush_size
    }

    fn set_brush_opacity(&mut self, opacity: f64) {
        self.state.borrow_mut().brush_opacity = opacity;
    }

    fn brush_opacity(&self) -> f64 {
        self.state.borrow().brush_opacity
    }

    fn set_brush_scatter(&mut self, scatter: f64) {
        self.state.borrow_mut().brush_scatter = scatter;
    }

    fn draw(&mut self, path: &[Vec2]) {
        self.state.borrow_mut().strokes.push(path.to_vec());
    }

    fn clear_layer(&mut self) {
        self.state.borrow_mut().clear_count += 1;
    }

    fn color(&self) -> Rgb {
        Rgb::new(20, 30, 40)
    }

    fn hide_tool_panel(&mut self) {
        self.state.borrow_mut().tool_panel_hidden = true;
    }
}

struct FakeBuilder {
    state: Rc<RefCell<AppState>>,
    capabilities: CapabilitySet,
    builds: Rc<RefCell<u32>>,
    fail: bool,
}

impl AppBuilder for FakeBuilder {
    fn build(
        &mut self,
        project: Project,
        _options: &EngineOptions,
    ) -> Result<Box<dyn CanvasApp>, EngineError> {
        *self.builds.borrow_mut() += 1;
        if self.fail {
            return Err(EngineError::Construction("engine exploded".to_string()));
        }
        self.state.borrow_mut().project = Some(project);
        Ok(Box::new(FakeApp {
            capabilities: self.capabilities.clone(),
            state: Rc::clone(&self.state),
        }))
    }
}

#[derive(Default)]
struct SinkLog {
    text: Option<String>,
    errored: bool,
    removed: bool,
}

struct RecordingSink {
    log: Rc<RefCell<SinkLog>>,
}

impl StatusSink for RecordingSink {
    fn set_text(&mut self, text: &str) {
        self.log.borrow_mut().text = Some(text.to_string());
    }

    fn mark_errored(&mut self) {
        self.log.borrow_mut().errored = true;
    }

    fn remove(&mut self) {
        self.log.borrow_mut().removed = true;
    }
}

struct IdleLoader;

impl DecoderLoader for IdleLoader {
    fn begin_load(&mut self) {}
}

struct Harness {
    embed: Embed,
    app: Rc<RefCell<AppState>>,
    builds: Rc<RefCell<u32>>,
    sink: Rc<RefCell<SinkLog>>,
}

fn harness(project: Option<Project>, fail_build: bool, capabilities: CapabilitySet) -> Harness {
    let app = Rc::new(RefCell::new(AppState::default()));
    let builds = Rc::new(RefCell::new(0));
    let sink = Rc::new(RefCell::new(SinkLog::default()));

    let embed = Embed::new(
        EmbedParams {
            project,
            options: EngineOptions {
                embed_url: "https://example.test/embed".to_string(),
                ..EngineOptions::default()
            },
        },
        Box::new(FakeBuilder {
            state: Rc::clone(&app),
            capabilities,
            builds: Rc::clone(&builds),
            fail: fail_build,
        }),
        Box::new(IdleLoader),
        Some(Box::new(RecordingSink {
            log: Rc::clone(&sink),
        })),
    );

    Harness {
        embed,
        app,
        builds,
        sink,
    }
}

fn sample_project(layer_name: &str) -> Project {
    Project {
        id: None,
        width: 320,
        height: 240,
        layers: vec![ProjectLayer {
            name: layer_name.to_string(),
            opacity: 1.0,
            is_visible: true,
            pixels: vec![],
        }],
    }
}

#[test]
fn opens_project_exactly_once() {
    let mut h = harness(None, false, CapabilitySet::full());

    h.embed
        .open_project(sample_project("first"))
        .expect("first open should succeed");
    let err = h
        .embed
        .open_project(sample_project("second"))
        .expect_err("second open must fail");

    assert_eq!(err, EmbedError::AlreadyInitialized);
    assert_eq!(*h.builds.borrow(), 1);
    let state = h.app.borrow();
    let kept = state.project.as_ref().expect("project captured by engine");
    assert_eq!(kept.layers[0].name, "first");
}

#[test]
fn project_supplied_at_construction_opens_immediately() {
    let h = harness(Some(sample_project("seed")), false, CapabilitySet::full());

    assert!(h.embed.is_initialized());
    assert_eq!(*h.builds.borrow(), 1);
    assert!(h.app.borrow().attached);
}

#[test]
fn successful_open_removes_status_sink_and_attaches_surface() {
    let mut h = harness(None, false, CapabilitySet::full());

    h.embed
        .open_project(sample_project("doc"))
        .expect("open should succeed");

    let sink = h.sink.borrow();
    assert!(sink.removed);
    assert!(!sink.errored);
    assert!(h.app.borrow().attached);
}

#[test]
fn open_backfills_missing_project_id() {
    let mut h = harness(None, false, CapabilitySet::full());

    h.embed
        .open_project(sample_project("doc"))
        .expect("open should succeed");

    let state = h.app.borrow();
    let project = state.project.as_ref().expect("project captured by engine");
    assert!(project.id.is_some());
}

#[test]
fn accessors_fail_before_construction_without_side_effects() {
    let mut h = harness(None, false, CapabilitySet::full());

    assert_eq!(h.embed.export_png(), Err(EmbedError::NotInitialized));
    assert_eq!(h.embed.export_psd(), Err(EmbedError::NotInitialized));
    assert_eq!(h.embed.set_brush_size(12.0), Err(EmbedError::NotInitialized));
    assert_eq!(h.embed.brush_size(), Err(EmbedError::NotInitialized));
    assert_eq!(
        h.embed.set_brush_opacity(0.5),
        Err(EmbedError::NotInitialized)
    );
    assert_eq!(h.embed.brush_opacity(), Err(EmbedError::NotInitialized));
    assert_eq!(
        h.embed.set_brush_scatter(0.3),
        Err(EmbedError::NotInitialized)
    );
    assert_eq!(
        h.embed.draw(&[Vec2::new(0.0, 0.0)]),
        Err(EmbedError::NotInitialized)
    );
    assert_eq!(h.embed.clear_layer(), Err(EmbedError::NotInitialized));
    assert_eq!(h.embed.color(), Err(EmbedError::NotInitialized));
    assert_eq!(h.embed.hide_tool_panel(), Err(EmbedError::NotInitialized));

    assert_eq!(*h.builds.borrow(), 0);
    let state = h.app.borrow();
    assert!(state.strokes.is_empty());
    assert_eq!(state.clear_count, 0);
    assert_eq!(state.brush_size, 0.0);
}

#[test]
fn accessors_reach_engine_after_construction() {
    let mut h = harness(Some(sample_project("doc")), false, CapabilitySet::full());

    h.embed
        .set_brush_size(24.0)
        .expect("set brush size should succeed");
    assert_eq!(h.embed.brush_size().expect("brush size read"), 24.0);

    h.embed
        .draw(&[Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)])
        .expect("draw should succeed");
    h.embed.clear_layer().expect("clear should succeed");
    h.embed
        .hide_tool_panel()
        .expect("hide tool panel should succeed");

    assert_eq!(h.embed.color().expect("color read"), Rgb::new(20, 30, 40));
    assert_eq!(
        h.embed.export_png().expect("png export")[..4],
        [0x89, b'P', b'N', b'G']
    );

    let state = h.app.borrow();
    assert_eq!(state.strokes.len(), 1);
    assert_eq!(state.strokes[0].len(), 2);
    assert_eq!(state.clear_count, 1);
    assert!(state.tool_panel_hidden);
}

#[test]
fn construction_failure_is_contained_and_not_retried() {
    let mut h = harness(None, true, CapabilitySet::full());

    let err = h
        .embed
        .open_project(sample_project("doc"))
        .expect_err("failing build must surface an error");
    assert!(matches!(err, EmbedError::Construction(_)));

    {
        let sink = h.sink.borrow();
        assert!(sink.errored);
        assert!(!sink.removed);
        let text = sink.text.as_ref().expect("sink text written");
        assert!(text.starts_with('❌'));
    }

    // Single-shot guard: the failed attempt consumed the one open.
    assert!(h.embed.is_initialized());
    let err = h
        .embed
        .open_project(sample_project("retry"))
        .expect_err("retry must be rejected");
    assert_eq!(err, EmbedError::AlreadyInitialized);
    assert_eq!(*h.builds.borrow(), 1);
    assert_eq!(h.embed.export_png(), Err(EmbedError::NotInitialized));
}

#[test]
fn undeclared_capability_is_rejected_without_reaching_engine() {
    let capabilities: CapabilitySet = [EmbedCapability::Draw, EmbedCapability::GetColor]
        .into_iter()
        .collect();
    let mut h = harness(Some(sample_project("doc")), false, capabilities);

    let err = h
        .embed
        .set_brush_size(10.0)
        .expect_err("undeclared operation must fail");
    assert_eq!(err, EmbedError::Unsupported(EmbedCapability::SetBrushSize));
    assert_eq!(h.app.borrow().brush_size, 0.0);

    h.embed
        .draw(&[Vec2::new(5.0, 5.0)])
        .expect("declared operation should pass");
    assert!(h.embed.supports(EmbedCapability::Draw).expect("supports query"));
    assert!(!h
        .embed
        .supports(EmbedCapability::SetBrushSize)
        .expect("supports query"));
}

#[test]
fn report_init_error_marks_sink_without_touching_lifecycle() {
    let mut h = harness(None, false, CapabilitySet::full());

    h.embed.report_init_error("bundle failed to load");

    let sink = h.sink.borrow();
    assert!(sink.errored);
    let text = sink.text.as_ref().expect("sink text written");
    assert!(text.contains("bundle failed to load"));
    drop(sink);

    assert!(!h.embed.is_initialized());
    assert_eq!(*h.builds.borrow(), 0);
}
