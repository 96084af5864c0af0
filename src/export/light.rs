use crate::export::document::{LightRecord, ObjectKind};
use crate::scene_graph::Light;

pub fn serialize_light(light: &Light) -> LightRecord {
    LightRecord {
        name: ObjectKind::Light.data_name(&light.name),
        kind: light.kind.as_str().to_string(),
        energy: light.energy,
        color: light.color,
    }
}
