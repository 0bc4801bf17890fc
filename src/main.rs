//! Puzzle Viz entry point
//!
//! On the web this attaches the trajectory visualizer to `#canvas`. Natively
//! it exposes the same core as a small command line tool.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_viz {
    use std::cell::RefCell;

    use glam::DVec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlInputElement};

    use puzzle_viz::platform::web::CanvasBinding;
    use puzzle_viz::renderer::trajectory_scene;
    use puzzle_viz::sim::{parse_checkpoints, split_waypoints};
    use puzzle_viz::{Settings, Viewport};

    thread_local! {
        static BINDING: RefCell<Option<CanvasBinding>> = const { RefCell::new(None) };
    }

    fn input_value(id: &str) -> String {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|e| e.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    /// Draw a trajectory on `#canvas`, replacing whatever was attached before
    #[wasm_bindgen]
    pub fn show_trajectory(commands: &str, future: &str, checkpoints: &str) -> Result<(), JsValue> {
        let settings = Settings::load();
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        canvas.set_width(settings.canvas_size);
        canvas.set_height(settings.canvas_size);

        let (waypoints, ahead) = split_waypoints(commands, future);
        let checkpoints = parse_checkpoints(checkpoints);
        let points: Vec<DVec2> = waypoints
            .iter()
            .chain(ahead.iter())
            .map(|w| w.position())
            .chain(
                checkpoints
                    .iter()
                    .map(|&(x, y)| DVec2::new(x as f64, y as f64)),
            )
            .collect();
        let viewport = Viewport::fit(points).with_zoom(settings.zoom_factors());
        let style = settings.render_style();

        log::info!(
            "Showing {} waypoints, {} ahead, {} checkpoints",
            waypoints.len(),
            ahead.len(),
            checkpoints.len()
        );

        // Old listeners go before new ones are registered
        detach();
        let binding = CanvasBinding::attach(canvas, viewport, move |vp| {
            trajectory_scene(vp, &style, &checkpoints, &waypoints, &ahead)
        })?;
        BINDING.with(|b| *b.borrow_mut() = Some(binding));
        Ok(())
    }

    /// Remove listeners and stop drawing
    #[wasm_bindgen]
    pub fn detach() {
        BINDING.with(|b| b.borrow_mut().take());
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Puzzle Viz starting...");

        let commands = input_value("commands");
        let future = input_value("future");
        let checkpoints = input_value("checkpoints");
        if let Err(e) = show_trajectory(&commands, &future, &checkpoints) {
            log::error!("Failed to attach visualizer: {:?}", e);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_viz::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::error::Error;
    use std::fs;
    use std::path::PathBuf;

    use clap::{Parser, Subcommand};
    use glam::DVec2;

    use puzzle_viz::api::{ResolveRequest, SimulationRequest, SimulationResponse};
    use puzzle_viz::board::{Bounds, SparseGrid, infer_links};
    use puzzle_viz::renderer::{as_bytes, board_scene, tessellate, trajectory_scene, walk_scene};
    use puzzle_viz::sim::{LambdaMap, ReplayController, parse_checkpoints, split_waypoints};
    use puzzle_viz::{Settings, Viewport};

    #[derive(Parser, Debug)]
    #[command(name = "puzzle-viz")]
    #[command(about = "Trajectory, board and walk tools for the contest dashboard")]
    struct Cli {
        /// Settings JSON; missing fields take their defaults
        #[arg(long, global = true)]
        settings: Option<PathBuf>,
        #[command(subcommand)]
        command: Commands,
    }

    #[derive(Subcommand, Debug)]
    enum Commands {
        /// Integrate a command string and print the waypoints as JSON
        Trajectory {
            commands: String,
            /// Planned commands past the executed ones
            #[arg(long, default_value = "")]
            future: String,
            /// Checkpoint file, one `x y` pair per line
            #[arg(long)]
            checkpoints: Option<PathBuf>,
            /// Report the tessellated scene size instead of waypoints
            #[arg(long)]
            vertices: bool,
        },
        /// Walk a map and print the result
        Walk { map: PathBuf, directions: String },
        /// Step a replay cursor over a walk, printing the map at each stop
        Replay {
            map: PathBuf,
            directions: String,
            /// Cursor moves, e.g. `3 -1 10`
            #[arg(allow_hyphen_values = true, num_args = 1..)]
            deltas: Vec<i64>,
        },
        /// Normalize a board and print its links
        Grid {
            board: PathBuf,
            /// Print the tabular dialect instead
            #[arg(long)]
            tsv: bool,
        },
        /// Print the simulate request body for a board
        SimulateRequest {
            board: PathBuf,
            val_a: i64,
            val_b: i64,
            turns: u32,
        },
        /// Print the resolve request body for a board
        ResolveRequest { board: PathBuf },
        /// Decode a simulate response and print the resulting board
        Outcome { response: PathBuf },
    }

    fn load_settings(path: Option<&PathBuf>) -> Result<Settings, Box<dyn Error>> {
        match path {
            Some(path) => Ok(Settings::from_json(&fs::read_to_string(path)?)?),
            None => Ok(Settings::load()),
        }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let cli = Cli::parse();
        let settings = load_settings(cli.settings.as_ref())?;

        match cli.command {
            Commands::Trajectory {
                commands,
                future,
                checkpoints,
                vertices,
            } => {
                let checkpoints = match checkpoints {
                    Some(path) => parse_checkpoints(&fs::read_to_string(path)?),
                    None => Vec::new(),
                };
                let (waypoints, ahead) = split_waypoints(&commands, &future);
                if vertices {
                    let points = waypoints
                        .iter()
                        .chain(ahead.iter())
                        .map(|w| w.position())
                        .chain(checkpoints.iter().map(|&(x, y)| DVec2::new(x as f64, y as f64)));
                    let vp = Viewport::fit(points).with_zoom(settings.zoom_factors());
                    let scene =
                        trajectory_scene(&vp, &settings.render_style(), &checkpoints, &waypoints, &ahead);
                    let verts = tessellate(&scene);
                    println!(
                        "{} commands, {} vertices, {} bytes",
                        scene.len(),
                        verts.len(),
                        as_bytes(&verts).len()
                    );
                } else {
                    println!("{}", serde_json::to_string_pretty(&waypoints)?);
                    if !ahead.is_empty() {
                        println!("{}", serde_json::to_string_pretty(&ahead)?);
                    }
                }
            }
            Commands::Walk { map, directions } => {
                let walked = LambdaMap::parse(&fs::read_to_string(map)?).walked(&directions);
                println!("{}", walked.to_text());
                log::info!(
                    "{} pills left, {} drawn",
                    walked.remaining,
                    walk_scene(&walked).len()
                );
                if walked.is_cleared() {
                    println!("cleared");
                }
            }
            Commands::Replay {
                map,
                directions,
                deltas,
            } => {
                let map = LambdaMap::parse(&fs::read_to_string(map)?);
                let mut replay: ReplayController<LambdaMap> = ReplayController::new(directions);
                for delta in deltas {
                    let Some(request) = replay.step(delta) else {
                        continue;
                    };
                    let prefix: String = request.source.chars().take(request.step as usize).collect();
                    replay.accept(&request, Ok(map.walked(&prefix)));
                    if replay.needs_more(request.source.chars().count() + 1) {
                        log::warn!("Step {} is past the end of the walk", request.step);
                    }
                    if let Some(snapshot) = replay.snapshot() {
                        println!("step {}:\n{}\n", replay.current_index(), snapshot.to_text());
                    }
                }
            }
            Commands::Grid { board, tsv } => {
                let grid = SparseGrid::parse(&fs::read_to_string(board)?);
                if tsv {
                    println!("{}", grid.to_tsv());
                } else {
                    println!("{}", grid);
                }
                let links = if settings.show_links {
                    infer_links(&grid)
                } else {
                    Vec::new()
                };
                for link in &links {
                    println!("{} -> {}", link.from, link.to);
                }
                log::info!(
                    "{} cells, {} links, {} drawn",
                    grid.len(),
                    links.len(),
                    board_scene(&grid, Bounds::DEFAULT_WINDOW, &links).len()
                );
            }
            Commands::SimulateRequest {
                board,
                val_a,
                val_b,
                turns,
            } => {
                let grid = SparseGrid::parse(&fs::read_to_string(board)?);
                let request = SimulationRequest::new(&grid, val_a, val_b, turns);
                log::info!("POST {}simulate", settings.api_base_url);
                println!("{}", request.to_json()?);
            }
            Commands::ResolveRequest { board } => {
                let grid = SparseGrid::parse(&fs::read_to_string(board)?);
                log::info!("POST {}resolve", settings.api_base_url);
                println!("{}", serde_json::to_string(&ResolveRequest::new(&grid))?);
            }
            Commands::Outcome { response } => {
                let outcome = SimulationResponse::from_json(&fs::read_to_string(response)?)?
                    .into_result()?;
                println!("{}", outcome.board);
                match outcome.output {
                    Some(output) => println!("output {} score {}", output, outcome.score),
                    None => println!("no output, score {}", outcome.score),
                }
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = cli::run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
