//! Rename, velocity gradient, split and read back a small 21cmFAST cache
use cmfast_util::boxes::{read_box, CoevalBox};
use cmfast_util::hdf5::{require_group, write_attr, write_dataset, AttrMap, AttrValue, File};
use cmfast_util::record::{AttrGroups, PerturbedField, VelocityGradient};
use cmfast_util::relocate::Relocation;
use cmfast_util::split::{split_all, SplitRule};
use cmfast_util::{batch, rename, Cosmology};
use ndarray::Array3;
use std::f64::consts::PI;
use std::path::Path;

const N: usize = 16;
const BOX_LEN: f64 = 64.;
const SEED: i64 = 731995;

fn param_groups() -> AttrGroups {
    let mut groups = AttrGroups::new();
    let mut user = AttrMap::new();
    user.insert("HII_DIM".to_owned(), AttrValue::Int(N as i64));
    user.insert("BOX_LEN".to_owned(), AttrValue::Float(BOX_LEN));
    groups.insert("user_params".to_owned(), user);
    let mut cosmo = AttrMap::new();
    cosmo.insert("hlittle".to_owned(), AttrValue::Float(0.7));
    cosmo.insert("OMm".to_owned(), AttrValue::Float(0.3));
    cosmo.insert("POWER_INDEX".to_owned(), AttrValue::Float(0.9667));
    groups.insert("cosmo_params".to_owned(), cosmo);
    groups
}

fn write_perturbed_field(dir: &Path, redshift: f64) {
    let vel = Array3::from_shape_fn((N, N, N), |(_, _, k)| {
        (1e-16 * (2. * PI * 2. * k as f64 / N as f64).sin()) as f32
    });
    let field = PerturbedField::new(param_groups(), Some(redshift), Some(SEED), vel).unwrap();
    field
        .write(dir.join(format!("PerturbedField_{:x}_r{}.h5", 0xbc9f_u32, SEED)))
        .unwrap();
}

fn write_brightness_temp(dir: &Path, redshift: f64, a_vcb: f64) {
    let file = File::create(dir.join(format!("BrightnessTemp_8346578_r{}.h5", SEED))).unwrap();
    write_attr(&file, "redshift", &AttrValue::Float(redshift)).unwrap();
    write_attr(&file, "random_seed", &AttrValue::Int(SEED)).unwrap();
    let astro = require_group(&file, "astro_params").unwrap();
    write_attr(&astro, "A_VCB", &AttrValue::Float(a_vcb)).unwrap();
}

#[test]
fn test_pipeline() {
    let cache = tempfile::tempdir().unwrap();
    write_perturbed_field(cache.path(), 6.);
    write_brightness_temp(cache.path(), 6., 1.);

    // rename
    let renamed = rename::rename_all(cache.path(), Relocation::Move).unwrap();
    assert_eq!(renamed.len(), 2);
    let dir = cache.path().join(rename::RENAMED_DIR);
    assert!(dir.join("PerturbedField_z6.000_s731995.h5").is_file());
    assert!(dir.join("BrightnessTemp_z6.000_s731995.h5").is_file());

    // velocity gradient
    let outputs = batch::write_velocity_gradient_all(&dir, 2).unwrap();
    assert_eq!(outputs, vec![dir.join("VelocityGradient_z6.000_s731995.h5")]);
    let record = VelocityGradient::read(&outputs[0]).unwrap();
    assert_eq!(record.random_seed, Some(SEED));
    assert!(record.groups.contains_key("cosmo_params"));
    assert_eq!(
        record.groups["cosmo_params"].get("POWER_INDEX"),
        Some(&AttrValue::Float(0.9667))
    );

    let kz = 2. * PI * 2. / BOX_LEN;
    let hz = Cosmology::new(0.7, 0.3).hubble_rate(6.);
    for ((_, _, k), d) in record.velocity_gradient.indexed_iter() {
        let expected = 1e-16 * kz * (kz * k as f64 * BOX_LEN / N as f64).cos() / hz;
        assert!(
            (f64::from(*d) - expected).abs() < 1e-4 * 1e-16 * kz / hz,
            "got {} expected {}",
            d,
            expected
        );
    }

    // split
    let relocated = split_all(&dir, &SplitRule::default()).unwrap();
    // BrightnessTemp moved, PerturbedField and VelocityGradient linked twice
    assert_eq!(relocated.len(), 5);
    let d0 = dir.join("A_VCB_0.0");
    let d1 = dir.join("A_VCB_1.0");
    assert!(d1.join("BrightnessTemp_z6.000_s731995.h5").is_file());
    assert!(!d0.join("BrightnessTemp_z6.000_s731995.h5").exists());

    // read through the links
    for d in [&d0, &d1] {
        let dvdr = read_box(d, CoevalBox::VelocityGradient, 6., SEED).unwrap();
        assert_eq!(dvdr, record.velocity_gradient);
        let vel = read_box(d, CoevalBox::Velocity, 6., SEED).unwrap();
        assert_eq!(vel.shape(), &[N, N, N]);
    }
}

#[test]
fn test_batch_aborts_on_broken_record() {
    let dir = tempfile::tempdir().unwrap();
    let mut groups = param_groups();
    groups.get_mut("cosmo_params").unwrap().remove("OMm");
    let file = File::create(dir.path().join("PerturbedField_z6.000_s1.h5")).unwrap();
    for (name, attrs) in &groups {
        let group = require_group(&file, name).unwrap();
        for (key, value) in attrs {
            write_attr(&group, key, value).unwrap();
        }
    }
    let velocity = require_group(&file, "PerturbedField").unwrap();
    write_dataset(&velocity, "velocity", &Array3::<f32>::zeros((N, N, N))).unwrap();
    drop(velocity);
    drop(file);
    assert!(matches!(
        batch::write_velocity_gradient_all(dir.path(), 2),
        Err(cmfast_util::Error::MissingAttribute { .. })
    ));
}
