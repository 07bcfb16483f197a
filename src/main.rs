mod config;
mod error;
mod field;
mod render;
mod scheduler;
mod style;

use std::path::PathBuf;
use std::time::Instant;

use iced::canvas::{self, event, Cache, Canvas, Cursor, Geometry};
use iced::{
    executor, mouse, time, window, Application, Clipboard, Color, Command, Container, Element,
    Length, Point, Rectangle, Settings, Subscription,
};
use tracing_subscriber::EnvFilter;

use crate::config::Parameters;
use crate::field::Field;
use crate::render::DisplayList;
use crate::scheduler::{Scheduler, Ticker};

const WINDOW_SIZE: (u32, u32) = (1024, 768);

#[derive(Debug)]
enum Message {
    Loaded(Parameters),
    Frame(Instant),
    Resized { width: u32, height: u32 },
    PointerMoved(Point),
    PointerLeft,
}

struct Plexus {
    scheduler: Option<Scheduler<Ticker>>,
    width: u32,
    height: u32,
    visible: bool,
    hero: Hero,
}

impl Plexus {
    fn start(&mut self, parameters: Parameters) {
        let field = Field::new(
            parameters.particle_count,
            self.width as f32,
            self.height as f32,
            &mut rand::thread_rng(),
        );

        match field {
            Ok(field) => {
                self.hero.background = parameters.background();
                let mut scheduler =
                    Scheduler::start(Ticker::default(), field, parameters, self.width, self.height);
                if !self.visible {
                    scheduler.set_visible(false);
                }
                self.scheduler = Some(scheduler);
            }
            Err(err) => {
                tracing::error!("Particle network disabled: {}", err);
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;

        // a minimised window reports a zero-sized surface
        let visible = width > 0 && height > 0;

        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.resize(width, height);
            if visible != self.visible {
                scheduler.set_visible(visible);
            }
        }

        self.visible = visible;
    }
}

impl Application for Plexus {
    type Executor = executor::Default;
    type Message = Message;
    type Flags = ();

    fn new(_flags: Self::Flags) -> (Self, Command<Message>) {
        let (width, height) = WINDOW_SIZE;
        (
            Self {
                scheduler: None,
                width,
                height,
                visible: true,
                hero: Hero::new(Parameters::default().background()),
            },
            Command::perform(
                config::load(PathBuf::from(config::PARAMETERS_FILE)),
                Message::Loaded,
            ),
        )
    }

    fn title(&self) -> String {
        String::from("Plexus")
    }

    fn subscription(&self) -> Subscription<Message> {
        let resizes = iced_native::subscription::events_with(|event, _status| match event {
            iced_native::Event::Window(iced_native::window::Event::Resized { width, height }) => {
                Some(Message::Resized { width, height })
            }
            _ => None,
        });

        match &self.scheduler {
            Some(scheduler) if scheduler.is_running() => Subscription::batch(vec![
                resizes,
                time::every(scheduler.parameters().frame_interval()).map(Message::Frame),
            ]),
            _ => resizes,
        }
    }

    fn update(&mut self, message: Self::Message, _clipboard: &mut Clipboard) -> Command<Message> {
        match message {
            Message::Loaded(parameters) => {
                self.start(parameters);
            }
            Message::Frame(_) => {
                if let Some(scheduler) = self.scheduler.as_mut() {
                    if let Some(handle) = scheduler.pending() {
                        if scheduler.run_frame(handle, &mut self.hero.display) {
                            self.hero.cache.clear();
                        }
                    }
                }
            }
            Message::Resized { width, height } => {
                self.resize(width, height);
            }
            Message::PointerMoved(position) => {
                if let Some(scheduler) = self.scheduler.as_mut() {
                    scheduler.pointer_moved(position);
                }
            }
            Message::PointerLeft => {
                if let Some(scheduler) = self.scheduler.as_mut() {
                    scheduler.pointer_left();
                }
            }
        }
        Command::none()
    }

    fn view(&mut self) -> Element<'_, Message> {
        let background = self.hero.background;

        let canvas = Canvas::new(&mut self.hero)
            .width(Length::Fill)
            .height(Length::Fill);

        Container::new(canvas)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(style::Container(background))
            .into()
    }
}

/// The canvas program: replays the last painted frame and turns mouse events
/// into pointer signals.
struct Hero {
    display: DisplayList,
    background: Color,
    cache: Cache,
}

impl Hero {
    fn new(background: Color) -> Self {
        Self {
            display: DisplayList::default(),
            background,
            cache: Cache::default(),
        }
    }
}

impl canvas::Program<Message> for Hero {
    fn update(
        &mut self,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (event::Status, Option<Message>) {
        let message = match event {
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                Some(match cursor.position_in(&bounds) {
                    Some(position) => Message::PointerMoved(position),
                    None => Message::PointerLeft,
                })
            }
            canvas::Event::Mouse(mouse::Event::CursorLeft) => Some(Message::PointerLeft),
            _ => None,
        };

        (event::Status::Ignored, message)
    }

    fn draw(&self, bounds: Rectangle, _cursor: Cursor) -> Vec<Geometry> {
        let network = self.cache.draw(bounds.size(), |frame| {
            self.display.replay(frame, self.background);
        });

        vec![network]
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting plexus");

    Plexus::run(Settings {
        window: window::Settings {
            size: WINDOW_SIZE,
            ..window::Settings::default()
        },
        antialiasing: true,
        ..Settings::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plexus(width: u32, height: u32) -> Plexus {
        Plexus {
            scheduler: None,
            width,
            height,
            visible: width > 0 && height > 0,
            hero: Hero::new(Color::BLACK),
        }
    }

    fn running(app: &Plexus) -> bool {
        app.scheduler.as_ref().map_or(false, |s| s.is_running())
    }

    #[test]
    fn zero_sized_window_pauses_until_restored() {
        let mut app = plexus(800, 600);
        app.start(Parameters::default());
        assert!(running(&app));

        app.resize(0, 0);
        assert!(!running(&app));
        app.resize(0, 0);
        assert!(!running(&app));

        app.resize(500, 400);
        assert!(running(&app));
        assert!(app.visible);
    }

    #[test]
    fn start_while_hidden_is_stopped() {
        let mut app = plexus(800, 600);
        app.resize(0, 0);
        assert!(app.scheduler.is_none());

        app.start(Parameters::default());
        assert!(app.scheduler.is_some());
        assert!(!running(&app));

        app.resize(640, 480);
        assert!(running(&app));
    }

    #[test]
    fn invalid_count_disables_animation() {
        let mut app = plexus(800, 600);
        app.start(Parameters {
            particle_count: 0,
            ..Parameters::default()
        });
        assert!(app.scheduler.is_none());

        app.resize(0, 0);
        app.resize(500, 400);
        assert!(app.scheduler.is_none());
    }
}
