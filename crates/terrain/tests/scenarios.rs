//! End-to-end terrain scenarios.
//!
//! These tests exercise the full noise → heightmap file → mesh path:
//! - A fixed noise reference value for seed 237
//! - A 256x256 heightmap written to disk with the expected header and body size
//! - A small heightmap producing the expected vertex and index counts

use terrain::prelude::*;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("terrain_{}_{name}", std::process::id()))
}

#[test]
fn test_reference_sample_for_seed_237() {
    let field = NoiseField::new(237);
    let value = field.sample(5.0, 5.0, 0.8);
    assert_eq!(value.to_bits(), 0.1420800000000001f64.to_bits());
}

#[test]
fn test_256_heightmap_file_layout() {
    let field = NoiseField::new(237);
    let sampling = NoiseSampling::new(256, 256).with_scale(10.0).with_z(0.8);
    let image = Heightmap::from_noise(&field, &sampling).unwrap();

    let path = temp_path("scenario_b.ppm");
    Ppm::write_file(&path, &image).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let header = b"P6\n256 256\n255\n";
    assert_eq!(&bytes[..header.len()], header);
    assert_eq!(bytes.len() - header.len(), 256 * 256 * 3);

    let loaded = Ppm::load_bytes(&bytes).unwrap();
    assert_eq!(loaded, image);
}

#[test]
fn test_4x4_heightmap_mesh_counts() {
    let pixels = (0..16u8).map(|v| [v * 16, 0, 0]).collect();
    let image = Heightmap::new(4, 4, pixels).unwrap();

    let path = temp_path("scenario_c.ppm");
    Ppm::write_file(&path, &image).unwrap();
    let loaded = Ppm::load_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let codec = HeightCodec::new(40.0).unwrap();
    let mesh = build_from_heightmap(&loaded, &codec, &MeshConfig::default()).unwrap();

    assert_eq!(mesh.vertices.len(), 16);
    assert_eq!(mesh.indices.len(), 54);
    assert!(mesh.indices.iter().all(|&i| i < 16));
    assert_eq!(mesh.triangle_count(), 18);
}

#[test]
fn test_noise_mesh_invariants_for_random_grids() {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..10 {
        let w = rng.gen_range(2..40);
        let h = rng.gen_range(2..40);
        let field = NoiseField::new(rng.r#gen());
        let sampling = NoiseSampling::new(w, h).with_scale(rng.gen_range(0.5..20.0));
        let mesh = build_from_noise(&field, &sampling, 25.0, &MeshConfig::default()).unwrap();

        assert_eq!(mesh.vertices.len(), w * h);
        assert_eq!(mesh.indices.len(), 6 * (w - 1) * (h - 1));
        let max = mesh.indices.iter().copied().max().unwrap();
        assert!((max as usize) < mesh.vertices.len());
        for vertex in &mesh.vertices {
            let [nx, ny, nz] = vertex.normal;
            assert!(((nx * nx + ny * ny + nz * nz).sqrt() - 1.0).abs() < 1e-5);
            assert!(ny > 0.0);
        }
    }
}

#[test]
fn test_fractional_banding_heightmap_decodes_within_amplitude() {
    let field = NoiseField::new(237);
    let sampling = NoiseSampling::new(32, 32).with_fractional_scale(20.0);
    let image = Heightmap::from_noise(&field, &sampling).unwrap();
    let codec = HeightCodec::new(40.0).unwrap();
    let mesh = build_from_heightmap(&image, &codec, &MeshConfig::default()).unwrap();

    let (lo, hi) = mesh.height_range().unwrap();
    assert!(lo >= -40.0 && hi < 40.0);
    assert!(hi - lo > 1.0);
}
