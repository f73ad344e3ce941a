use crate::animation::Animation;
use crate::geometry::DOWN;
use crate::layout::{Arrangement, GridConfig};
use crate::scene::{Scene, SceneContext};
use anyhow::{Context, Result};

const ICONS: [&str; 7] = [
    "CPUassets.svg",
    "GPUassets.svg",
    "RAMassets.svg",
    "6502assets.svg",
    "ALUassets.svg",
    "greenassets.svg",
    "jennyassets.svg",
];

const PILE_SIZE: usize = 100;

/// A tall grid of hardware icons the camera pans down
pub struct ComputerPile;

impl Scene for ComputerPile {
    fn name(&self) -> &'static str {
        "ComputerPile"
    }

    fn description(&self) -> &'static str {
        "Camera pan over a pile of randomly chosen hardware icons"
    }

    fn construct(&self, ctx: &mut SceneContext<'_>) -> Result<()> {
        let mut pile = Vec::with_capacity(PILE_SIZE);
        for _ in 0..PILE_SIZE {
            let icon = *ctx.choose(&ICONS).context("no icons to choose from")?;
            pile.push(ctx.svg(icon)?);
        }
        let group = ctx.group(&pile)?;
        ctx.arrange(group, &Arrangement::grid(GridConfig::cols(6)))?;
        ctx.add(group)?;

        ctx.set_camera_y(25.0);

        ctx.play(vec![Animation::camera_shift(DOWN * 40.5).with_run_time(10.0)])?;
        ctx.play(vec![Animation::camera_shift(DOWN * 11.0).with_run_time(1.0)])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::Vec2;
    use crate::mobject::VisualKind;
    use crate::scene::registry::BuildOptions;
    use crate::scene::{SceneRegistry, StepKind};
    use crate::scenes::fixtures;

    #[test]
    fn test_pile_and_camera_path() {
        let assets = fixtures::asset_dir();
        let record = SceneRegistry::builtin()
            .build("ComputerPile", &BuildOptions::new(assets.path(), 42))
            .unwrap();

        assert_eq!(record.visible.len(), 100);
        let steps = record.timeline.steps();
        assert!(matches!(steps[0].kind, StepKind::Add { .. }));
        assert!(matches!(steps[1].kind, StepKind::SetCamera { center } if center == Vec2::new(0.0, 25.0)));
        assert_eq!(record.duration, 11.0);
        assert!((record.camera.y - (25.0 - 40.5 - 11.0)).abs() < 1e-9);
    }

    #[test]
    fn test_same_seed_same_pile() {
        let assets = fixtures::asset_dir();
        let registry = SceneRegistry::builtin();
        let a = registry
            .build("ComputerPile", &BuildOptions::new(assets.path(), 9))
            .unwrap();
        let b = registry
            .build("ComputerPile", &BuildOptions::new(assets.path(), 9))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a.fingerprint().unwrap(), b.fingerprint().unwrap());
    }

    #[test]
    fn test_pile_uses_every_icon_kind() {
        let assets = fixtures::asset_dir();
        let record = SceneRegistry::builtin()
            .build("ComputerPile", &BuildOptions::new(assets.path(), 1))
            .unwrap();
        let mut paths: Vec<_> = record
            .visible
            .iter()
            .filter_map(|id| match &record.objects.get(*id).unwrap().kind {
                VisualKind::Svg(src) => Some(src.path.clone()),
                _ => None,
            })
            .collect();
        paths.sort();
        paths.dedup();
        // 100 draws over 7 icons
        assert_eq!(paths.len(), 7);
    }

    #[test]
    fn test_missing_icon_fails() {
        let assets = fixtures::asset_dir();
        for icon in fixtures::ICONS {
            fixtures::remove(assets.path(), icon);
        }
        let result = SceneRegistry::builtin()
            .build("ComputerPile", &BuildOptions::new(assets.path(), 0));
        assert!(result.is_err());
    }
}
