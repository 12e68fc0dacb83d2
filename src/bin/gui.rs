use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts, EguiPlugin, EguiPrimaryContextPass};
use deepvein::*;
use deepvein::engine::Pointer;
use deepvein::tile::SOIL_SURFACE_APPEARANCE;

// ---------- Constants ----------
const PLAYER_SPEED: f64 = 100.0;
const FALL_SPEED: f64 = 60.0;
const CONFIG_ENV: &str = "DEEPVEIN_CONFIG";

// ---------- Components ----------
#[derive(Component)]
struct TileSprite {
	layer: Layer,
	x: i32,
	y: i32,
}

#[derive(Component)]
struct PlayerSprite;

#[derive(Component)]
struct DrillSprite;

#[derive(Component)]
struct LanderSprite;

#[derive(Component)]
struct MinerSprite;

// ---------- Resources ----------
#[derive(Resource)]
struct GameEngine {
	engine: Engine,
}

#[derive(Resource, Default)]
struct HostState {
	won: bool,
	request_rebuild: bool,
	drill_grounded: bool,
	lander_grounded: bool,
	hide_soil: bool,
}

// ---------- Entry ----------
fn main() {
	let config = load_config();
	let engine = match Engine::new(config) {
		Ok(engine) => engine,
		Err(err) => {
			eprintln!("Cannot start session: {err}");
			std::process::exit(1);
		}
	};

	App::new()
		.add_plugins(DefaultPlugins.set(WindowPlugin {
			primary_window: Some(Window {
				title: "Deepvein".to_string(),
				resolution: (1280, 800).into(),
				..Default::default()
			}),
			..Default::default()
		}))
		.add_plugins(EguiPlugin::default())
		// Resources
		.insert_resource(GameEngine { engine })
		.insert_resource(HostState { request_rebuild: true, ..Default::default() })
		// Setup
		.add_systems(Startup, setup_camera)
		// Frame systems
		.add_systems(
			Update,
			(
				handle_reset,
				toggle_soil_layer,
				step_simulation,
				build_sprites_when_needed,
				sync_tile_sprites,
				sync_agent_sprites,
				follow_player,
			)
				.chain(),
		)
		.add_systems(EguiPrimaryContextPass, draw_ui)
		.run();
}

fn load_config() -> SimConfig {
	let Ok(path) = std::env::var(CONFIG_ENV) else {
		return SimConfig::default();
	};
	match std::fs::read_to_string(&path) {
		Ok(text) => match SimConfig::from_json_str(&text) {
			Ok(config) => config,
			Err(err) => {
				eprintln!("Ignoring {path}: {err}");
				SimConfig::default()
			}
		},
		Err(err) => {
			eprintln!("Cannot read {path}: {err}");
			SimConfig::default()
		}
	}
}

// ---------- Setup ----------
fn setup_camera(mut commands: Commands, engine: Res<GameEngine>) {
	let (px, py) = engine.engine.player.body.center();
	commands.spawn((Camera2d, Transform::from_xyz(px as f32, -py as f32, 1000.0)));
}

// ---------- Utilities ----------
// Simulation space grows downward; bevy's y axis grows upward.
fn to_screen(x: f64, y: f64, z: f32) -> Vec3 {
	Vec3::new(x as f32, -(y as f32), z)
}

fn layer_depth(layer: Layer) -> f32 {
	match layer {
		Layer::Cave => 10.0,
		Layer::Pipe => 20.0,
		Layer::Ore => 30.0,
		Layer::Soil => 40.0,
	}
}

fn tile_color(tile: &Tile) -> Color {
	let alpha = tile.intensity().unwrap_or(1.0) as f32;
	match tile {
		Tile::Cave { .. } => Color::srgb(0.12, 0.09, 0.08),
		Tile::Pipe { appearance } => {
			let shade = 0.45 + (*appearance as f32) * 0.03;
			Color::srgb(shade, shade, shade + 0.05)
		}
		Tile::Ore { .. } => Color::srgb(0.87, 0.44, 0.15),
		Tile::Soil { appearance, .. } if *appearance == SOIL_SURFACE_APPEARANCE => {
			Color::srgba(0.35, 0.45, 0.2, alpha)
		}
		Tile::Soil { .. } => Color::srgba(0.45, 0.32, 0.2, alpha),
	}
}

fn body_hits_soil(world: &TileWorld, body: &Body) -> bool {
	world
		.coords_within_world_rect(body.x, body.y, body.width, body.height)
		.into_iter()
		.any(|c| world.has_tile_at(Layer::Soil, c))
}

fn resting_on_soil(world: &TileWorld, body: &Body) -> bool {
	world
		.coords_within_world_rect(body.x, body.bottom(), body.width, 0.01)
		.into_iter()
		.any(|c| world.has_tile_at(Layer::Soil, c))
		|| body.bottom() >= world.height() as f64 * world.tile_size()
}

/// Drops a body by `dy`, landing it flush on the first soil row it would
/// enter. Returns whether the body is grounded.
fn fall(world: &TileWorld, body: &mut Body, dy: f64) -> bool {
	if resting_on_soil(world, body) {
		return true;
	}
	let moved = Body { y: body.y + dy, ..*body };
	if body_hits_soil(world, &moved) {
		let tile = world.tile_size();
		body.y = (moved.bottom() / tile).floor() * tile - body.height;
		return true;
	}
	*body = moved;
	false
}

fn cursor_world(
	windows: &Query<&Window, With<PrimaryWindow>>,
	q_cam: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
	let window = windows.single().ok()?;
	let cursor = window.cursor_position()?;
	let (camera, camera_transform) = q_cam.single().ok()?;
	camera.viewport_to_world_2d(camera_transform, cursor).ok()
}

// ---------- Systems: Simulation ----------
fn handle_reset(
	mut commands: Commands,
	keys: Res<ButtonInput<KeyCode>>,
	mut eng: ResMut<GameEngine>,
	mut host: ResMut<HostState>,
	miners: Query<Entity, With<MinerSprite>>,
) {
	if !keys.just_pressed(KeyCode::Escape) {
		return;
	}
	if let Err(err) = eng.engine.reset() {
		log::error!("Reset failed: {err}");
		return;
	}
	for e in &miners {
		commands.entity(e).despawn();
	}
	*host = HostState { request_rebuild: true, ..Default::default() };
}

// O shows what lies under the soil.
fn toggle_soil_layer(keys: Res<ButtonInput<KeyCode>>, mut host: ResMut<HostState>) {
	if keys.just_pressed(KeyCode::KeyO) {
		host.hide_soil = !host.hide_soil;
	}
}

fn step_simulation(
	time: Res<Time>,
	keys: Res<ButtonInput<KeyCode>>,
	mouse_buttons: Res<ButtonInput<MouseButton>>,
	windows: Query<&Window, With<PrimaryWindow>>,
	q_cam: Query<(&Camera, &GlobalTransform)>,
	mut eng: ResMut<GameEngine>,
	mut host: ResMut<HostState>,
) {
	if host.won {
		return;
	}
	let dt = time.delta_secs() as f64;
	let engine = &mut eng.engine;

	// Player: free flight, stopped by soil.
	let mut body = engine.player.body;
	let mut blocked_left = false;
	let mut blocked_right = false;
	let dx = if keys.pressed(KeyCode::KeyA) {
		-PLAYER_SPEED * dt
	} else if keys.pressed(KeyCode::KeyD) {
		PLAYER_SPEED * dt
	} else {
		0.0
	};
	if dx != 0.0 {
		let moved = Body { x: body.x + dx, ..body };
		if body_hits_soil(&engine.world, &moved) {
			blocked_left = dx < 0.0;
			blocked_right = dx > 0.0;
		} else {
			body = moved;
		}
	}
	let dy = if keys.pressed(KeyCode::KeyW) {
		-PLAYER_SPEED * dt
	} else if keys.pressed(KeyCode::KeyS) {
		PLAYER_SPEED * dt
	} else {
		0.0
	};
	let moved = Body { y: body.y + dy, ..body };
	if dy != 0.0 && !body_hits_soil(&engine.world, &moved) {
		body = moved;
	}

	let mut drill_body = engine.drill.body;
	host.drill_grounded = fall(&engine.world, &mut drill_body, FALL_SPEED * dt);
	let mut lander_body = engine.lander.body;
	host.lander_grounded = fall(&engine.world, &mut lander_body, FALL_SPEED * dt);
	engine.lander.body = lander_body;

	let pointer = cursor_world(&windows, &q_cam).map(|p| Pointer {
		world_x: p.x as f64,
		world_y: -(p.y as f64),
		pressed: mouse_buttons.pressed(MouseButton::Left),
	});

	let input = TickInput {
		delta_ms: dt * 1000.0,
		player: Some(PlayerContact { body, blocked_left, blocked_right }),
		drill: Some(DrillContact { body: drill_body, grounded: host.drill_grounded }),
		lander_grounded: host.lander_grounded,
		pointer,
	};
	host.won = engine.tick(&input).won;
}

// ---------- Systems: Rendering ----------
fn build_sprites_when_needed(
	mut commands: Commands,
	mut host: ResMut<HostState>,
	eng: Res<GameEngine>,
	existing: Query<Entity, Or<(With<TileSprite>, With<PlayerSprite>, With<DrillSprite>, With<LanderSprite>)>>,
) {
	if !host.request_rebuild {
		return;
	}
	for e in &existing {
		commands.entity(e).despawn();
	}
	let world = &eng.engine.world;
	let tile = world.tile_size();
	for layer in Layer::ALL {
		for y in 0..world.height() {
			for x in 0..world.width() {
				let (cx, cy) = world.tile_center(TileCoord::new(x, y));
				commands.spawn((
					Sprite::from_color(Color::NONE, Vec2::splat(tile as f32)),
					Transform::from_translation(to_screen(cx, cy, layer_depth(layer))),
					Visibility::Hidden,
					TileSprite { layer, x, y },
				));
			}
		}
	}
	let agents = [
		(eng.engine.lander.body, Color::srgb(0.7, 0.7, 0.75), 101.0),
		(eng.engine.drill.body, Color::srgb(0.9, 0.8, 0.1), 100.0),
		(eng.engine.player.body, Color::srgb(0.2, 0.7, 1.0), 102.0),
	];
	for (i, (body, color, z)) in agents.into_iter().enumerate() {
		let (cx, cy) = body.center();
		let mut entity = commands.spawn((
			Sprite::from_color(color, Vec2::new(body.width as f32, body.height as f32)),
			Transform::from_translation(to_screen(cx, cy, z)),
		));
		match i {
			0 => entity.insert(LanderSprite),
			1 => entity.insert(DrillSprite),
			_ => entity.insert(PlayerSprite),
		};
	}
	host.request_rebuild = false;
}

fn sync_tile_sprites(
	eng: Res<GameEngine>,
	host: Res<HostState>,
	mut q: Query<(&TileSprite, &mut Sprite, &mut Visibility)>,
) {
	let engine = &eng.engine;
	for (pos, mut sprite, mut visibility) in &mut q {
		let c = TileCoord::new(pos.x, pos.y);
		if host.hide_soil && pos.layer == Layer::Soil {
			*visibility = Visibility::Hidden;
			continue;
		}
		match engine.world.get_tile(pos.layer, c) {
			Some(tile) => {
				let highlighted = pos.layer == Layer::Soil
					&& (engine.player.target == Some(c) || engine.drill.targets.contains(&c));
				sprite.color = if highlighted {
					Color::srgba(1.0, 0.78, 0.78, tile.intensity().unwrap_or(1.0) as f32)
				} else {
					tile_color(tile)
				};
				*visibility = Visibility::Visible;
			}
			None => *visibility = Visibility::Hidden,
		}
	}
}

fn sync_agent_sprites(
	mut commands: Commands,
	eng: Res<GameEngine>,
	mut q_player: Query<&mut Transform, (With<PlayerSprite>, Without<DrillSprite>, Without<LanderSprite>)>,
	mut q_drill: Query<&mut Transform, (With<DrillSprite>, Without<PlayerSprite>, Without<LanderSprite>)>,
	mut q_lander: Query<&mut Transform, (With<LanderSprite>, Without<PlayerSprite>, Without<DrillSprite>)>,
	q_miners: Query<&MinerSprite>,
) {
	let engine = &eng.engine;
	let place = |t: &mut Transform, body: &Body| {
		let (cx, cy) = body.center();
		t.translation.x = cx as f32;
		t.translation.y = -(cy as f32);
	};
	if let Ok(mut t) = q_player.single_mut() {
		place(&mut *t, &engine.player.body);
	}
	if let Ok(mut t) = q_drill.single_mut() {
		place(&mut *t, &engine.drill.body);
	}
	if let Ok(mut t) = q_lander.single_mut() {
		place(&mut *t, &engine.lander.body);
	}

	// Miners only ever get added, so spawn sprites for the new tail.
	let shown = q_miners.iter().count();
	let size = engine.world.tile_size() as f32 * 0.75;
	for miner in engine.economy.miners().iter().skip(shown) {
		let (x, y) = miner.position;
		commands.spawn((
			Sprite::from_color(Color::srgb(0.95, 0.6, 0.2), Vec2::splat(size)),
			Transform::from_translation(to_screen(x, y, 35.0)),
			MinerSprite,
		));
	}
}

fn follow_player(
	eng: Res<GameEngine>,
	mut q_cam: Query<&mut Transform, (With<Camera>, Without<PlayerSprite>)>,
) {
	let Ok(mut cam) = q_cam.single_mut() else { return };
	let (px, py) = eng.engine.player.body.center();
	cam.translation.x = px as f32;
	cam.translation.y = -(py as f32);
}

// ---------- Systems: UI ----------
fn draw_ui(mut egui_ctx: EguiContexts, eng: Res<GameEngine>, host: Res<HostState>) {
	if let Ok(ctx) = egui_ctx.ctx_mut() {

	egui::TopBottomPanel::top("top_hud").show(&*ctx, |ui_top| {
		ui_top.horizontal(|ui_row| {
			ui_row.label(format_hud(&eng.engine.economy, &eng.engine.drill));
			ui_row.separator();
			ui_row.label(format!("Miners: {}", eng.engine.economy.active_miners()));
			ui_row.separator();
			ui_row.label("WASD move · click ore to build a miner · O toggle soil · Esc restart");
		});
	});

	egui::SidePanel::right("miner_panel")
		.resizable(true)
		.default_width(240.0)
		.show(&*ctx, |ui_right| {
			egui::ScrollArea::vertical().show(ui_right, |ui_scroll| {
				for line in format_miner_panel(&eng.engine.economy) {
					ui_scroll.label(line);
				}
			});
		});

	if host.won {
		egui::Area::new("win_banner".into()).fixed_pos(egui::pos2(480.0, 360.0)).show(&*ctx, |ui_area| {
			egui::Frame::none().fill(egui::Color32::from_rgba_unmultiplied(0, 0, 0, 192)).show(ui_area, |ui_banner| {
				ui_banner.heading(WIN_BANNER);
				ui_banner.label("Press Esc to play again");
			});
		});
	}

	} // end if Ok(ctx)
}
