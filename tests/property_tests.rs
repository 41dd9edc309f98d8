use clusterstep::cluster::{Clustering, Dbscan, Kmeans, PointStatus, NOISE, UNASSIGNED};
use clusterstep::dataset::{generate_dataset, DatasetKind};
use clusterstep::Point;
use proptest::prelude::*;

fn points_strategy(max: usize) -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec((0.0f64..100.0, 0.0f64..100.0), 0..max)
        .prop_map(|coords| coords.into_iter().map(Point::from).collect())
}

fn kind_strategy() -> impl Strategy<Value = DatasetKind> {
    prop::sample::select(DatasetKind::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_kmeans_labels_valid_and_steps_monotonic(
        data in points_strategy(60),
        k in 1usize..=10,
        max_iter in 1usize..=20,
        seed in any::<u64>(),
    ) {
        let states: Vec<_> = Kmeans::new(k).with_max_iter(max_iter).with_seed(seed).start(&data).collect();

        prop_assert!(!states.is_empty());
        prop_assert!(states.last().unwrap().complete);
        prop_assert_eq!(states.iter().filter(|s| s.complete).count(), 1);
        for pair in states.windows(2) {
            prop_assert!(pair[0].step <= pair[1].step);
        }
        for s in &states {
            for p in s.data_points() {
                prop_assert!(p.cluster == UNASSIGNED || (0..k as i32).contains(&p.cluster));
            }
            if !data.is_empty() {
                prop_assert_eq!(s.data_points().count(), data.len());
                prop_assert_eq!(s.centroids().count(), k.min(data.len()));
            }
        }
        // Rounds never exceed the budget: at most 3 snapshots per round plus the start
        // and the terminal one.
        prop_assert!(states.len() <= 3 * max_iter + 2);
    }

    #[test]
    fn prop_dbscan_classifies_every_point(
        data in points_strategy(80),
        eps in 1.0f64..20.0,
        min_pts in 2usize..=15,
    ) {
        let states: Vec<_> = Dbscan::new(eps, min_pts).start(&data).collect();
        let last = states.last().unwrap();

        prop_assert!(last.complete);
        prop_assert_eq!(last.points.len(), data.len());
        for pair in states.windows(2) {
            prop_assert!(pair[0].step <= pair[1].step);
        }
        for p in &last.points {
            prop_assert_ne!(p.cluster, UNASSIGNED);
            prop_assert!(matches!(p.status, PointStatus::Core | PointStatus::Border | PointStatus::Noise));
            prop_assert_eq!(p.cluster == NOISE, p.status == PointStatus::Noise);
        }
        // Cluster labels are 1..=count with no gaps.
        let count = last.cluster_count() as i32;
        prop_assert!(last.points.iter().all(|p| p.cluster == NOISE || (1..=count).contains(&p.cluster)));
    }

    #[test]
    fn prop_dbscan_noise_has_no_core_neighbor(
        data in points_strategy(80),
        eps in 1.0f64..20.0,
        min_pts in 2usize..=15,
    ) {
        let last = Dbscan::new(eps, min_pts).run_to_end(&data);
        for (i, p) in last.points.iter().enumerate() {
            if p.cluster != NOISE {
                continue;
            }
            let here = data[i];
            for (j, q) in last.points.iter().enumerate() {
                if j != i && here.distance(&data[j]) <= eps {
                    prop_assert_ne!(q.status, PointStatus::Core);
                }
            }
        }
    }

    #[test]
    fn prop_dbscan_deterministic(
        data in points_strategy(60),
        eps in 1.0f64..20.0,
        min_pts in 2usize..=15,
    ) {
        let a = Dbscan::new(eps, min_pts).fit_predict(&data);
        let b = Dbscan::new(eps, min_pts).fit_predict(&data);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn prop_datasets_reproducible(kind in kind_strategy(), n in 1usize..400) {
        let a = generate_dataset(kind, n, None, None);
        let b = generate_dataset(kind, n, None, None);
        prop_assert_eq!(&a, &b);
        if kind != DatasetKind::Rings {
            prop_assert_eq!(a.points.len(), n);
        }
    }

    #[test]
    fn prop_engines_leave_input_untouched(data in points_strategy(40), k in 1usize..5) {
        let copy = data.clone();
        let _ = Kmeans::new(k).with_seed(1).fit_predict(&data);
        let _ = Dbscan::new(5.0, 3).fit_predict(&data);
        prop_assert_eq!(data, copy);
    }
}
