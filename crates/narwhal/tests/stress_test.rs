use narwhal::{Error, Graph, Point, StressLayout};

fn scattered(n: usize) -> Vec<Point> {
    // Deterministic, non-degenerate start without relying on the solver's own seeding.
    (0..n)
        .map(|i| {
            let t = i as f64;
            Point::new((t * 37.0) % 23.0 - 11.0, (t * 53.0) % 29.0 - 14.0)
        })
        .collect()
}

fn house() -> Graph {
    Graph::from_edges(6, [(0, 1), (1, 2), (2, 3), (3, 0), (2, 4), (3, 4), (4, 5)])
}

#[test]
fn stress_never_increases_between_iterations() {
    let g = house();
    let base = StressLayout::new(40.0)
        .with_rel_tol(0.0)
        .with_initial_locs(scattered(6));

    let mut history = Vec::new();
    for iters in 0..=20 {
        let opts = base.clone().with_max_iter(iters);
        let locs = opts.solve(&g).unwrap();
        history.push(opts.stress(&g, &locs).unwrap());
    }

    for w in history.windows(2) {
        assert!(w[1] <= w[0], "stress went up: {history:?}");
    }
    assert!(history[20] < history[0], "no progress: {history:?}");
}

#[test]
fn stress_descends_with_pinned_vertices() {
    let g = house();
    let base = StressLayout::new(40.0)
        .with_rel_tol(0.0)
        .with_initial_locs(scattered(6))
        .with_mask(vec![false, true, true, true, true, false]);

    let mut history = Vec::new();
    for iters in 0..=10 {
        let opts = base.clone().with_max_iter(iters);
        let locs = opts.solve(&g).unwrap();
        history.push(opts.stress(&g, &locs).unwrap());
    }
    for w in history.windows(2) {
        assert!(w[1] <= w[0], "stress went up: {history:?}");
    }
}

#[test]
fn pinned_vertices_keep_their_initial_locations() {
    let g = house();
    let initial = scattered(6);
    let mask = vec![true, false, true, true, false, true];
    let locs = StressLayout::default()
        .with_initial_locs(initial.clone())
        .with_mask(mask.clone())
        .solve(&g)
        .unwrap();
    for (i, movable) in mask.iter().enumerate() {
        if !movable {
            assert_eq!(locs[i], initial[i], "vertex {i} is pinned");
        }
    }
}

#[test]
fn fully_pinned_graph_is_returned_unchanged() {
    let g = house();
    let initial = scattered(6);
    let locs = StressLayout::default()
        .with_initial_locs(initial.clone())
        .with_mask(vec![false; 6])
        .solve(&g)
        .unwrap();
    assert_eq!(locs, initial);
}

#[test]
fn disconnected_components_get_finite_positions() {
    let g = Graph::from_edges(7, [(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 6)]);
    let locs = StressLayout::default().solve(&g).unwrap();
    assert_eq!(locs.len(), 7);
    assert!(locs.iter().all(Point::is_finite), "{locs:?}");
    for i in 0..7 {
        for j in (i + 1)..7 {
            assert!(locs[i].distance(&locs[j]) > 1.0, "{i} and {j} overlap");
        }
    }
}

#[test]
fn weighted_edges_stretch_target_distances() {
    let mut g = Graph::new(3);
    g.add_edge(0, 1);
    g.add_weighted_edge(1, 2, 2.0);
    let locs = StressLayout::new(30.0)
        .with_rel_tol(1e-12)
        .with_max_iter(2_000)
        .solve(&g)
        .unwrap();
    let short = locs[0].distance(&locs[1]);
    let long = locs[1].distance(&locs[2]);
    assert!((short - 30.0).abs() < 3.0, "short edge {short}");
    assert!((long - 60.0).abs() < 6.0, "long edge {long}");
}

#[test]
fn converged_path_reaches_near_zero_stress() {
    let g = Graph::path(4);
    let opts = StressLayout::default().with_rel_tol(1e-12).with_max_iter(5_000);
    let locs = opts.solve(&g).unwrap();
    let stress = opts.stress(&g, &locs).unwrap();
    assert!(stress < 1e-2, "stress {stress}");
}

#[test]
fn iteration_cap_is_not_an_error() {
    let g = house();
    let locs = StressLayout::default().with_max_iter(1).solve(&g).unwrap();
    assert_eq!(locs.len(), 6);
    assert!(locs.iter().all(Point::is_finite));
}

#[test]
fn default_iteration_cap_grows_with_the_square_of_the_vertex_count() {
    assert_eq!(StressLayout::default().effective_max_iter(5), 10_000);
    assert_eq!(StressLayout::default().with_max_iter(7).effective_max_iter(5), 7);
}

#[test]
fn explicit_weights_must_be_a_symmetric_square_matrix() {
    let g = Graph::path(2);
    let bad = [
        vec![vec![0.0, 1.0]],
        vec![vec![0.0, 1.0], vec![2.0, 0.0]],
        vec![vec![0.0, -1.0], vec![-1.0, 0.0]],
        vec![vec![0.0, f64::NAN], vec![f64::NAN, 0.0]],
    ];
    for w in bad {
        let err = StressLayout::default().with_weights(w).solve(&g).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }), "{err}");
    }
    let ok = StressLayout::default()
        .with_weights(vec![vec![0.0, 2.0], vec![2.0, 0.0]])
        .solve(&g)
        .unwrap();
    assert!((ok[0].distance(&ok[1]) - 50.0).abs() < 1.0);
}

#[test]
fn coincident_start_positions_are_split_apart() {
    let g = Graph::path(4);
    let opts = StressLayout::default().with_initial_locs(vec![Point::new(5.0, 5.0); 4]);
    let a = opts.solve(&g).unwrap();
    assert_eq!(a, opts.solve(&g).unwrap());
    for i in 0..4 {
        assert!(a[i].is_finite());
        for j in (i + 1)..4 {
            assert!(a[i].distance(&a[j]) > 1.0, "{i} and {j} still overlap: {a:?}");
        }
    }
}

#[test]
fn stationary_iterate_ends_the_solve_with_zero_tolerance() {
    // The free middle vertex sits on the Guttman fixed point between its pinned neighbors, so
    // no iteration can improve the stress.
    let g = Graph::path(3);
    let initial = vec![Point::new(-30.0, 0.0), Point::new(0.0, 0.0), Point::new(30.0, 0.0)];
    let opts = StressLayout::default()
        .with_rel_tol(0.0)
        .with_max_iter(usize::MAX)
        .with_mask(vec![false, true, false])
        .with_initial_locs(initial.clone());
    let locs = opts.solve(&g).unwrap();
    assert_eq!(locs, initial);
    assert!(opts.stress(&g, &locs).unwrap() > 0.0);
}
