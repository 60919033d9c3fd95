use crawler2d::{Creature, CreatureConfig, StepKind, TickReport, TripodGroup, Viewport};
use serde_json::json;

fn print_usage_and_exit() -> ! {
    eprintln!(
        "Usage:\n  gait_dump [--config <creature.json>] [--viewport <w> <h>] <commands...>\n\nCommands:\n  --move <x> <y>\n  --leave\n  --resize <w> <h>\n  --step <dt> <count>\n  --legs\n"
    );
    std::process::exit(2);
}

fn group_name(group: TripodGroup) -> &'static str {
    match group {
        TripodGroup::A => "A",
        TripodGroup::B => "B",
    }
}

fn kind_name(kind: StepKind) -> &'static str {
    match kind {
        StepKind::Turn => "turn",
        StepKind::Settle => "settle",
        StepKind::Critical => "critical",
    }
}

fn dump_tick(creature: &Creature, report: &TickReport, with_legs: bool) {
    let head = creature.spine().head();
    let steps: Vec<_> = report
        .steps
        .iter()
        .map(|s| {
            json!({
                "leg": s.leg,
                "group": group_name(s.group),
                "kind": kind_name(s.kind),
            })
        })
        .collect();
    let mut out = json!({
        "tick": report.tick,
        "dt": report.dt,
        "speed": report.motion.speed,
        "idleBlend": report.motion.idle_blend,
        "activeGroup": group_name(report.active_group),
        "head": [head.position.x, head.position.y],
        "headAngle": head.angle,
        "steps": steps,
    });
    if with_legs {
        let legs: Vec<_> = creature
            .legs()
            .iter()
            .map(|leg| {
                json!({
                    "foot": [leg.foot.x, leg.foot.y],
                    "renderFoot": [leg.render_foot.x, leg.render_foot.y],
                    "lift": leg.lift_height,
                    "moving": leg.is_moving,
                    "reach": leg.shoulder.distance(leg.foot),
                })
            })
            .collect();
        out["legs"] = json!(legs);
    }
    println!("{out}");
}

fn parse<T: std::str::FromStr>(args: &[String], i: usize) -> T {
    args.get(i)
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| print_usage_and_exit())
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        print_usage_and_exit();
    }

    let mut config = CreatureConfig::default();
    let mut viewport = Viewport::new(1280.0, 720.0).expect("viewport");
    let mut i = 0;
    loop {
        match args.get(i).map(String::as_str) {
            Some("--config") if i + 1 < args.len() => {
                let text = std::fs::read_to_string(&args[i + 1]).expect("read config");
                config = CreatureConfig::from_json_str(&text).expect("parse config");
                i += 2;
            }
            Some("--viewport") if i + 2 < args.len() => {
                viewport = Viewport::new(parse(&args, i + 1), parse(&args, i + 2))
                    .expect("viewport");
                i += 3;
            }
            _ => break,
        }
    }

    let mut creature = Creature::new(config, viewport).expect("creature");
    let mut with_legs = false;
    while i < args.len() {
        match args[i].as_str() {
            "--legs" => {
                with_legs = true;
                i += 1;
            }
            "--move" if i + 2 < args.len() => {
                let x: f32 = parse(&args, i + 1);
                let y: f32 = parse(&args, i + 2);
                creature.input_mut().pointer_moved(x, y);
                i += 3;
            }
            "--leave" => {
                creature.input_mut().pointer_left();
                i += 1;
            }
            "--resize" if i + 2 < args.len() => {
                let viewport = Viewport::new(parse(&args, i + 1), parse(&args, i + 2))
                    .expect("viewport");
                creature.resize(viewport);
                i += 3;
            }
            "--step" if i + 2 < args.len() => {
                let dt: f32 = parse(&args, i + 1);
                let count: usize = parse(&args, i + 2);
                for _ in 0..count {
                    let report = creature.update(dt);
                    dump_tick(&creature, &report, with_legs);
                }
                i += 3;
            }
            _ => print_usage_and_exit(),
        }
    }
}
