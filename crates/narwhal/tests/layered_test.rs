use narwhal::{
    Error, Graph, LayeredLayout, Layout, SpectralLayout, SpringLayout, StressLayout, render_locs,
};

fn ladder() -> Graph {
    Graph::from_edges(6, [(0, 1), (1, 2), (3, 4), (4, 5), (0, 3), (1, 4), (2, 5)])
}

const Z: [f64; 6] = [0.0, 0.0, 0.0, 100.0, 100.0, 100.0];

#[test]
fn planar_coordinates_come_from_the_parent_unchanged() {
    let g = ladder();
    let flat = SpringLayout::new(40.0).solve(&g).unwrap();
    let lifted = LayeredLayout::new(Layout::Spring(SpringLayout::new(40.0)), Z.to_vec(), 0.5)
        .solve(&g)
        .unwrap();
    assert_eq!(lifted.len(), 6);
    for (i, p) in lifted.iter().enumerate() {
        assert_eq!(p.xy(), flat[i]);
        assert_eq!(p.z, Z[i] * 0.5);
    }
}

#[test]
fn layered_spring_uses_the_default_aspect_ratio_scale() {
    let g = ladder();
    let locs = render_locs(&g, &Layout::layered_spring(Z.to_vec(), 50.0, 0.2)).unwrap();
    let points = locs.as_spatial().unwrap();
    assert_eq!(points[0].z, 0.0);
    assert!((points[5].z - 20.0).abs() < 1e-12);
}

#[test]
fn layered_stress_matches_a_plain_stress_solve() {
    let g = ladder();
    let flat = StressLayout::new(30.0).solve(&g).unwrap();
    let locs = render_locs(&g, &Layout::layered_stress(Z.to_vec(), 30.0, 1.0)).unwrap();
    let points = locs.as_spatial().unwrap();
    for (i, p) in points.iter().enumerate() {
        assert_eq!(p.xy(), flat[i]);
        assert_eq!(p.z, Z[i]);
    }
}

#[test]
fn planar_spectral_parent_is_accepted() {
    let g = ladder();
    let opts = LayeredLayout::new(Layout::Spectral(SpectralLayout::default()), Z.to_vec(), 0.2);
    let locs = opts.solve(&g).unwrap();
    assert!(locs.iter().all(|p| p.is_finite()));
}

#[test]
fn spatial_parents_are_rejected() {
    let g = ladder();
    let parents = [
        Layout::Spectral(SpectralLayout::default().with_dimension(3)),
        Layout::layered_spring(Z.to_vec(), 50.0, 0.2),
    ];
    for parent in parents {
        let err = LayeredLayout::new(parent, Z.to_vec(), 0.2).solve(&g).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }), "{err}");
    }
}

#[test]
fn heights_and_aspect_ratio_are_validated() {
    let g = ladder();
    let bad = [
        LayeredLayout::new(Layout::default(), Z.to_vec(), 0.0),
        LayeredLayout::new(Layout::default(), Z.to_vec(), -1.0),
        LayeredLayout::new(Layout::default(), Z.to_vec(), f64::INFINITY),
        LayeredLayout::new(Layout::default(), vec![0.0; 5], 0.2),
        LayeredLayout::new(Layout::default(), vec![0.0, 0.0, 0.0, f64::NAN, 1.0, 1.0], 0.2),
    ];
    for opts in bad {
        let err = opts.solve(&g).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }), "{opts:?}: {err}");
    }
}
