use std::io::Cursor;

use vectorial_boolean_function::{
    table_io, AnalysisError, DifferentialSearchConfig, ErrorKind, PolynomialOverF2, TableKind,
    VectorialBooleanFunction, VectorialBooleanFunctionImpl,
};

const GF8_MODULUS: u64 = 0b1011;
const GF16_MODULUS: u64 = 0b10011;
const AES_MODULUS: u64 = 0x11b;

fn analyzed(power: u64, generator: u64) -> VectorialBooleanFunction {
    let mut function =
        VectorialBooleanFunction::new(power, PolynomialOverF2::new(generator)).unwrap();
    function.create_truth_table().unwrap();
    function.create_anf_table().unwrap();
    function.create_walsh_spectrum_table().unwrap();
    function
}

#[test]
fn identity_is_linear() {
    let identity = analyzed(1, GF8_MODULUS);
    assert_eq!(identity.truth_table(), &[0, 1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(identity.algebraic_degree().unwrap(), vec![1, 1, 1]);
    assert_eq!(identity.nonlinearity().unwrap(), vec![0, 0, 0]);
    assert_eq!(identity.disbalance().unwrap(), vec![0, 0, 0]);
    assert_eq!(identity.resiliency_order().unwrap(), vec![Some(0); 3]);
    for coordinate in 0..3 {
        assert_eq!(
            identity.coordinate_anf(coordinate).unwrap().to_string(),
            format!("x{}", coordinate)
        );
    }

    // every input difference propagates to itself with probability 1
    let mdp = identity
        .maximum_differential_probability(&DifferentialSearchConfig::new(2).unwrap())
        .unwrap();
    assert_eq!(mdp.max_count(), 8);
    assert_eq!(mdp.value(), 1.0);
}

#[test]
fn cube_is_almost_perfect_nonlinear() {
    let cube = analyzed(3, GF8_MODULUS);
    let mdp = cube
        .maximum_differential_probability(&DifferentialSearchConfig::new(3).unwrap())
        .unwrap();
    // 2^-(n-1) for n = 3
    assert_eq!(mdp.max_count(), 2);
    assert_eq!(mdp.value(), 0.25);
    assert_eq!(cube.nonlinearity().unwrap(), vec![2, 2, 2]);
}

#[test]
fn loaded_constant_zero_function() {
    let mut zero = VectorialBooleanFunction::new(3, PolynomialOverF2::new(GF8_MODULUS)).unwrap();
    let stored = "0\t0\n1\t0\n2\t0\n3\t0\n4\t0\n5\t0\n6\t0\n7\t0\n";
    zero.load_truth_table(table_io::read_truth_table(Cursor::new(stored)).unwrap())
        .unwrap();
    zero.create_anf_table().unwrap();
    zero.create_walsh_spectrum_table().unwrap();

    assert_eq!(zero.anf_table(), &[0; 8]);
    assert_eq!(zero.disbalance().unwrap(), vec![8, 8, 8]);
    assert_eq!(zero.nonlinearity().unwrap(), vec![0, 0, 0]);
    assert_eq!(zero.algebraic_degree().unwrap(), vec![0, 0, 0]);
    assert_eq!(zero.correlation_immunity().unwrap(), vec![3, 3, 3]);
    assert_eq!(zero.resiliency_order().unwrap(), vec![None; 3]);
    assert_eq!(zero.coordinate_anf(1).unwrap().to_string(), "0");

    let rde = zero.rate_distribution_error().unwrap();
    assert_eq!(rde.multivariate, vec![0, 0, 0]);
    assert_eq!(
        zero.relative_deviation_of_rde(&rde).unwrap().multivariate,
        vec![100.0, 100.0, 100.0]
    );
}

#[test]
fn bent_coordinates_reach_nonlinearity_bound() {
    // x^3 over GF(2^4): three bent coordinates, and the fourth is their sum
    let function = analyzed(3, GF16_MODULUS);
    let bound = (1 << 3) - (1 << 1);
    let nonlinearity = function.nonlinearity().unwrap();
    assert!(nonlinearity.iter().all(|nl| *nl <= bound));
    assert_eq!(nonlinearity, vec![6, 6, 6, 4]);
    assert_eq!(function.disbalance().unwrap(), vec![4, 4, 4, -8]);
    assert_eq!(function.max_algebraic_degree().unwrap(), 2);
}

#[test]
fn aes_inverse() {
    let inverse = analyzed(254, AES_MODULUS);
    assert_eq!(inverse.truth_table()[0], 0);
    assert_eq!(inverse.truth_table()[1], 1);
    assert_eq!(inverse.truth_table()[0x53], 0xca);
    assert_eq!(inverse.algebraic_degree().unwrap(), vec![7; 8]);
    assert_eq!(inverse.disbalance().unwrap(), vec![0; 8]);
    assert_eq!(inverse.nonlinearity().unwrap(), vec![112; 8]);
    assert_eq!(inverse.correlation_immunity().unwrap(), vec![0; 8]);

    let mdp = inverse
        .maximum_differential_probability(&DifferentialSearchConfig::default())
        .unwrap();
    assert_eq!(mdp.max_count(), 4);
    assert_eq!(mdp.value(), 4.0 / 256.0);
}

#[test]
fn stored_tables_reload_identically() {
    let original = analyzed(7, GF16_MODULUS);

    let mut truth_table = Vec::new();
    let mut anf_table = Vec::new();
    let mut walsh_spectrum_table = Vec::new();
    table_io::write_truth_table(&mut truth_table, original.truth_table()).unwrap();
    table_io::write_anf_table(&mut anf_table, original.anf_table()).unwrap();
    table_io::write_walsh_spectrum_table(&mut walsh_spectrum_table, original.walsh_spectrum_table())
        .unwrap();

    let mut reloaded =
        VectorialBooleanFunction::new(7, PolynomialOverF2::new(GF16_MODULUS)).unwrap();
    reloaded
        .load_truth_table(table_io::read_truth_table(truth_table.as_slice()).unwrap())
        .unwrap();
    reloaded
        .load_anf_table(table_io::read_anf_table(anf_table.as_slice()).unwrap())
        .unwrap();
    reloaded
        .load_walsh_spectrum_table(
            table_io::read_walsh_spectrum_table(walsh_spectrum_table.as_slice()).unwrap(),
        )
        .unwrap();

    assert_eq!(reloaded, original);
    assert_eq!(reloaded.nonlinearity().unwrap(), vec![4, 4, 4, 4]);
    assert_eq!(reloaded.algebraic_degree().unwrap(), vec![3, 3, 3, 3]);
}

#[test]
fn tables_are_populated_once() {
    let mut function = analyzed(3, GF8_MODULUS);
    for error in [
        function.create_truth_table().unwrap_err(),
        function.create_anf_table().unwrap_err(),
        function.create_walsh_spectrum_table().unwrap_err(),
        function
            .load_truth_table((0..8u32).map(|x| (x as usize, x)))
            .unwrap_err(),
    ] {
        assert_eq!(error.kind(), ErrorKind::PreconditionError);
    }
    assert_eq!(function.truth_table(), &[0, 1, 3, 4, 5, 6, 7, 2]);
}

#[test]
fn metrics_require_tables() {
    let mut function = VectorialBooleanFunction::new(5, PolynomialOverF2::new(0b100101)).unwrap();
    assert_eq!(
        function.algebraic_degree(),
        Err(AnalysisError::EmptyTable(TableKind::TruthTable))
    );
    function.create_truth_table().unwrap();
    function.create_walsh_spectrum_table().unwrap();
    assert_eq!(
        function.correlation_immunity(),
        Err(AnalysisError::EmptyTable(TableKind::AnfTable))
    );
    assert_eq!(
        function
            .maximum_differential_probability(&DifferentialSearchConfig::new(1).unwrap())
            .map(|mdp| mdp.max_count()),
        Err(AnalysisError::EmptyTable(TableKind::AnfTable))
    );
    function.create_anf_table().unwrap();
    assert_eq!(function.nonlinearity().unwrap(), vec![12; 5]);
    assert_eq!(
        function
            .maximum_differential_probability(&DifferentialSearchConfig::new(1).unwrap())
            .map(|mdp| mdp.max_count()),
        Ok(2)
    );
}

#[test]
fn call_syntax_matches_truth_table() {
    let function = analyzed(7, GF16_MODULUS);
    for x in 0..16u64 {
        let y = function(PolynomialOverF2::new(x)).unwrap();
        assert_eq!(y.coefficients(), function.truth_table()[x as usize] as u64);
    }
}
