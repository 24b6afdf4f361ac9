mod room;

use std::{collections::VecDeque, env, io, process};

use scenery::{
    launch,
    scene::{Scene, SceneError},
    ConfigParams, FrameScript, InputEvent, MouseButton, Navigator,
};

use log;
use log4rs;

/// Replays a recorded input sequence, one batch of events per frame.
struct Tour {
    navigator: Navigator,
    events: VecDeque<(u64, InputEvent)>,
    frame: u64,
}

impl Tour {
    fn new(params: &ConfigParams) -> Tour {
        let (width, height) = (params.viewport.width, params.viewport.height);
        let mut events = vec![
            (0, InputEvent::Resized { width, height }),
            (0, InputEvent::MouseMoved { x: width as i32 / 2, y: height as i32 / 2 }),
            (10, InputEvent::MouseDown(MouseButton::Left)),
            (
                40,
                InputEvent::MouseMoved {
                    x: width as i32 * 3 / 4,
                    y: height as i32 / 2,
                },
            ),
            (70, InputEvent::MouseUp(MouseButton::Left)),
            (80, InputEvent::Key('V')),
            (90, InputEvent::MouseDown(MouseButton::Right)),
            (110, InputEvent::MouseUp(MouseButton::Right)),
            (120, InputEvent::Key('i')),
        ];
        let mut frame = 130;
        for &key in ['h', 'h', 'h', 'H', 'H', 'H', 'p', 'P', 'r', 'R', 'x', 'X', 'y', 'Y', 'F', 'f', 'v']
            .iter()
        {
            events.push((frame, InputEvent::Key(key)));
            frame += 6;
        }
        events.push((frame + 30, InputEvent::Key('i')));
        events.push((frame + 60, InputEvent::Escape));

        Tour {
            navigator: Navigator::new(
                params.navigation.clone(),
                room::home_view(),
                width,
                height,
            ),
            events: events.into_iter().collect(),
            frame: 0,
        }
    }
}

impl FrameScript for Tour {
    fn handle_events(&mut self, scene: &Scene) -> Result<bool, SceneError> {
        let mut cont = true;
        while let Some(&(at, event)) = self.events.front() {
            if at > self.frame {
                break;
            }
            self.events.pop_front();
            log::debug!("Frame {}: {:?}", self.frame, event);
            let navigator = &mut self.navigator;
            if let Some(result) = scene.with_camera(|camera| navigator.handle(event, camera)) {
                cont &= result?;
            }
        }
        Ok(cont)
    }

    fn update(&mut self, scene: &Scene) -> Result<(), SceneError> {
        let navigator = &self.navigator;
        scene.with_camera(|camera| navigator.frame(camera));
        self.frame += 1;
        Ok(())
    }
}

fn main() {
    init_log(log::LevelFilter::Info, "roomview.log");

    let mut config_path = None;
    let mut frames = None;
    let mut lights = None;
    let mut print_graph = false;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            config_path = args.next();
        } else if arg == "--frames" {
            frames = args.next().and_then(|s| s.parse().ok());
        } else if arg == "--lights" {
            lights = args.next().and_then(|s| s.parse().ok());
        } else if arg == "--print-graph" {
            print_graph = true;
        } else {
            log::warn!("Unknown argument {}", arg);
        }
    }

    let mut params = match config_path {
        Some(path) => match ConfigParams::load(&path) {
            Ok(params) => params,
            Err(e) => {
                log::error!("{}", e);
                process::exit(1);
            }
        },
        None => ConfigParams::default(),
    };
    if frames.is_some() {
        params.render.max_frames = frames;
    }
    if let Some(lights) = lights {
        params.render.max_lights = lights;
    }

    let mut scene = match room::construct_scene(&params) {
        Ok(scene) => scene,
        Err(e) => {
            log::error!("Scene construction failed: {}", e);
            process::exit(1);
        }
    };
    if print_graph {
        let stdout = io::stdout();
        if let Err(e) = scene.print_graph(&mut stdout.lock()) {
            log::warn!("Failed to print scene graph: {}", e);
        }
    }

    let mut tour = Tour::new(&params);
    match launch(&params, &mut scene, &mut tour) {
        Ok(frames) => log::info!("{} frames drawn", frames),
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}

fn init_log(level: log::LevelFilter, log_file_name: &str) {
    use log4rs::{
        append::{console, file},
        config,
        encode::pattern,
        init_config,
    };

    let stdout = console::ConsoleAppender::builder()
        .encoder(Box::new(pattern::PatternEncoder::new(
            "[Console] {d} - {l} - {t} - {m}{n}",
        )))
        .build();

    let file = file::FileAppender::builder()
        .encoder(Box::new(pattern::PatternEncoder::new(
            "[File] {d} - {l} - {t} - {m}{n}",
        )))
        .append(false)
        .build(log_file_name)
        .unwrap();

    let config = config::Config::builder()
        .appender(config::Appender::builder().build("stdout", Box::new(stdout)))
        .appender(config::Appender::builder().build("file", Box::new(file)))
        .logger(
            config::Logger::builder()
                .appender("file")
                .additive(false)
                .build("scenery::scene", log::LevelFilter::Debug),
        )
        .build(
            config::Root::builder()
                .appender("stdout")
                .appender("file")
                .build(level),
        )
        .unwrap();

    let _ = init_config(config).unwrap();
}
