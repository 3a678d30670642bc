use crate::config::TowerKind;
use crate::game::{SessionState, TdGame};
use crate::geometry::Position;
use crate::level::LevelPhase;
use crate::tower::TowerId;
use sim_core::Tick;
use slotmap::Key;
use td_types::{
    BulletInfo, EnemyInfo, SessionStatus, SlotInfo, TdObservation, TowerInfo, WaveStatus,
};

pub fn tower_id_to_string(id: TowerId) -> String {
    id.data().as_ffi().to_string()
}

fn point(p: Position) -> td_types::Position {
    td_types::Position { x: p.x, y: p.y }
}

pub fn build_observation(game: &TdGame, tick: Tick) -> TdObservation {
    let level = game.level();
    let settings = game.settings();

    let status = match game.state() {
        SessionState::Running => SessionStatus::Running,
        SessionState::Won => SessionStatus::Won,
        SessionState::Lost => SessionStatus::Lost,
    };

    let wave_status = match level.phase() {
        LevelPhase::Spawning => WaveStatus::Spawning {
            spawned: level.spawned_count() as u32,
            wave_size: level.current_wave_size() as u32,
        },
        LevelPhase::WaveActive => WaveStatus::Active {
            alive: level.enemies().len() as u32,
        },
        LevelPhase::AllWavesComplete => WaveStatus::AllWavesComplete,
        LevelPhase::Leaked => WaveStatus::Leaked,
    };

    let slot_overlay = level.grid().show_slots();
    let slots = if slot_overlay {
        level
            .grid()
            .slots_with_availability(level.towers().values())
            .into_iter()
            .map(|(slot, available)| SlotInfo {
                x: slot.x,
                y: slot.y,
                available,
            })
            .collect()
    } else {
        Vec::new()
    };

    TdObservation {
        tick,
        time_ms: game.now().as_millis(),
        status,

        screen_width: settings.screen_width,
        screen_height: settings.screen_height,

        level_index: level.index() as u32,
        levels_total: game.levels_total() as u32,
        level_name: level.name().to_string(),
        paths: level
            .paths()
            .iter()
            .map(|path| path.iter().copied().map(point).collect())
            .collect(),

        money: game.money(),
        tower_costs: TowerKind::ALL
            .iter()
            .map(|&kind| (kind.as_str().to_string(), settings.cost(kind)))
            .collect(),

        current_wave: level.current_wave_index() as u32,
        waves_total: level.waves_total() as u32,
        waves_remaining: level.waves_remaining() as u32,
        wave_status,

        slot_overlay,
        slots,

        towers: level
            .towers()
            .iter()
            .map(|(id, t)| TowerInfo {
                id: tower_id_to_string(id),
                x: t.position().x,
                y: t.position().y,
                tower_type: t.kind().as_str().to_string(),
                level: t.level(),
                range: t.range(),
                damage: t.damage(),
                heading: t.heading(),
                upgrade_cost: settings.upgrade_cost(t.level()),
            })
            .collect(),
        enemies: level
            .enemies()
            .iter()
            .map(|e| EnemyInfo {
                id: e.id().0,
                x: e.position().x,
                y: e.position().y,
                health: e.health(),
                max_health: e.max_health(),
                sprite: e.sprite().to_string(),
            })
            .collect(),
        bullets: level
            .bullets()
            .iter()
            .map(|b| BulletInfo {
                x: b.position().x,
                y: b.position().y,
            })
            .collect(),
    }
}
