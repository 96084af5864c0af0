use std::collections::HashMap;

use itertools::Either;
use log::{debug, warn};

use crate::export::camera::serialize_camera;
use crate::export::document::{
    ExportDocument, MeshRecord, ObjectDataRecord, ObjectKind, ObjectRecord,
};
use crate::export::light::serialize_light;
use crate::export::mesh::serialize_mesh;
use crate::export::settings::ExportSettings;
use crate::scene_graph::{MeshId, Object3D, ObjectData, Scene};

/// Walks the scene (or its selection) in host order and collects one object
/// record per object plus one data record per object that has data.
///
/// Data blocks shared between objects are written once per object. Meshes
/// are only triangulated the first time they are reached.
pub fn build_document(scene: &Scene, settings: &ExportSettings) -> ExportDocument {
    let objects = if settings.selected_only {
        Either::Left(scene.selected_objects())
    } else {
        Either::Right(scene.objects())
    };

    let mut document = ExportDocument::default();
    let mut meshes = HashMap::new();

    for object in objects {
        let data = serialize_object_data(scene, object, settings, &mut meshes);
        let kind = data.as_ref().map_or(ObjectKind::Empty, ObjectDataRecord::kind);
        let data_name = data
            .as_ref()
            .map(|record| record.name().to_string())
            .unwrap_or_default();

        debug!("Object {} ({:?}) -> {:?}", object.name, kind, data_name);

        if let Some(record) = data {
            document.objectdata.push(record);
        }

        document.objects.push(ObjectRecord {
            name: object.name.clone(),
            kind,
            matrix: matrix_rows(object),
            data: data_name,
        });
    }

    document
}

fn serialize_object_data(
    scene: &Scene,
    object: &Object3D,
    settings: &ExportSettings,
    meshes: &mut HashMap<MeshId, MeshRecord>,
) -> Option<ObjectDataRecord> {
    let record = match &object.data {
        ObjectData::Mesh(id) => scene.get_mesh(*id).map(|mesh| {
            let record = meshes.entry(*id).or_insert_with(|| {
                serialize_mesh(mesh, settings.quad_method, settings.ngon_method)
            });
            ObjectDataRecord::Mesh(record.clone())
        }),
        ObjectData::Light(id) => scene
            .get_light(*id)
            .map(|light| ObjectDataRecord::Light(serialize_light(light))),
        ObjectData::Camera(id) => scene
            .get_camera(*id)
            .map(|camera| ObjectDataRecord::Camera(serialize_camera(camera))),
        ObjectData::Other(_) | ObjectData::None => return None,
    };

    if record.is_none() {
        warn!(
            "Object {} references a data block missing from the scene; exporting it as EMPTY",
            object.name
        );
    }

    record
}

fn matrix_rows(object: &Object3D) -> [[f64; 4]; 4] {
    let m = object.matrix_local;
    [
        m.row(0).to_array(),
        m.row(1).to_array(),
        m.row(2).to_array(),
        m.row(3).to_array(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene_graph::{Camera, Light, LightKind, PolyMesh};
    use glam::{DMat4, DQuat, DVec3, DVec4};

    fn sample_scene() -> Scene {
        let mut scene = Scene::new();
        let cube = scene.add_mesh(PolyMesh::cube("CubeMesh", 2.0));
        let lamp = scene.add_light(Light::new("Lamp", LightKind::Point, 1000.0, [1.0, 0.0, 0.0]));
        let lens = scene.add_camera(Camera::from_perspective("Lens", 0.7, 1.6));

        scene.add_object(
            Object3D::new("Cube", ObjectData::Mesh(cube))
                .with_transform(DVec3::new(1.0, 2.0, 3.0), DQuat::IDENTITY, DVec3::ONE),
        );
        scene.add_object(Object3D::new("Light", ObjectData::Light(lamp)).with_selected(true));
        scene.add_object(Object3D::new("Camera", ObjectData::Camera(lens)));
        scene.add_object(Object3D::empty("Locator").with_selected(true));
        scene.add_object(Object3D::new("Curve", ObjectData::Other("CURVE".into())));
        scene
    }

    #[test]
    fn every_object_is_recorded_in_order() {
        let document = build_document(&sample_scene(), &ExportSettings::default());

        let summary: Vec<_> = document
            .objects
            .iter()
            .map(|o| (o.name.as_str(), o.kind, o.data.as_str()))
            .collect();
        assert_eq!(
            summary,
            [
                ("Cube", ObjectKind::Mesh, "CubeMesh(mesh)"),
                ("Light", ObjectKind::Light, "Lamp(light)"),
                ("Camera", ObjectKind::Camera, "Lens(camera)"),
                ("Locator", ObjectKind::Empty, ""),
                ("Curve", ObjectKind::Empty, ""),
            ]
        );
        assert_eq!(document.objectdata.len(), 3);
    }

    #[test]
    fn every_reference_resolves_to_exactly_one_record() {
        let document = build_document(&sample_scene(), &ExportSettings::default());

        for object in &document.objects {
            let matches = document
                .objectdata
                .iter()
                .filter(|record| record.name() == object.data)
                .count();

            match document.data_for(object) {
                Some(record) => {
                    assert_eq!(matches, 1, "{}", object.name);
                    assert_eq!(record.kind(), object.kind);
                }
                None => assert_eq!(object.kind, ObjectKind::Empty, "{}", object.name),
            }
        }
    }

    #[test]
    fn selection_only_walks_selected_objects() {
        let settings = ExportSettings {
            selected_only: true,
            ..Default::default()
        };
        let document = build_document(&sample_scene(), &settings);

        let names: Vec<_> = document.objects.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["Light", "Locator"]);
        assert_eq!(document.objectdata.len(), 1);
    }

    #[test]
    fn empty_selection_gives_empty_document() {
        let mut scene = sample_scene();
        let ids: Vec<_> = scene.objects.iter().map(|(id, _)| id).collect();
        for id in ids {
            scene.set_selected(id, false);
        }

        let settings = ExportSettings {
            selected_only: true,
            ..Default::default()
        };
        assert_eq!(build_document(&scene, &settings), ExportDocument::default());
    }

    #[test]
    fn matrix_is_written_row_by_row() {
        let document = build_document(&sample_scene(), &ExportSettings::default());

        assert_eq!(
            document.objects[0].matrix,
            [
                [1.0, 0.0, 0.0, 1.0],
                [0.0, 1.0, 0.0, 2.0],
                [0.0, 0.0, 1.0, 3.0],
                [0.0, 0.0, 0.0, 1.0],
            ]
        );
    }

    #[test]
    fn non_affine_matrix_is_not_transposed() {
        let mut scene = Scene::new();
        let matrix = DMat4::from_cols(
            DVec4::new(1.0, 2.0, 3.0, 4.0),
            DVec4::new(5.0, 6.0, 7.0, 8.0),
            DVec4::new(9.0, 10.0, 11.0, 12.0),
            DVec4::new(13.0, 14.0, 15.0, 16.0),
        );
        scene.add_object(Object3D::empty("Skewed").with_matrix(matrix));

        let document = build_document(&scene, &ExportSettings::default());
        assert_eq!(document.objects[0].matrix[0], [1.0, 5.0, 9.0, 13.0]);
        assert_eq!(document.objects[0].matrix[3], [4.0, 8.0, 12.0, 16.0]);
    }

    #[test]
    fn shared_data_is_serialized_per_object() {
        let mut scene = Scene::new();
        let mesh = scene.add_mesh(PolyMesh::cube("Shared", 1.0));
        scene.add_object(Object3D::new("A", ObjectData::Mesh(mesh)));
        scene.add_object(Object3D::new("B", ObjectData::Mesh(mesh)));

        let document = build_document(&scene, &ExportSettings::default());
        assert_eq!(document.objectdata.len(), 2);
        assert!(document.objectdata.iter().all(|r| r.name() == "Shared(mesh)"));
        assert_eq!(document.objectdata[0], document.objectdata[1]);
        assert_eq!(document.objects[0].data, document.objects[1].data);
        assert_eq!(
            document.data_for(&document.objects[1]),
            Some(&document.objectdata[0])
        );
    }

    #[test]
    fn dangling_data_reference_becomes_empty() {
        let mut other = Scene::new();
        other.add_mesh(PolyMesh::new("First"));
        let foreign = other.add_mesh(PolyMesh::new("Second"));

        let mut scene = Scene::new();
        scene.add_object(Object3D::new("Orphan", ObjectData::Mesh(foreign)));

        let document = build_document(&scene, &ExportSettings::default());
        assert_eq!(document.objects[0].kind, ObjectKind::Empty);
        assert_eq!(document.objects[0].data, "");
        assert!(document.objectdata.is_empty());
    }
}
