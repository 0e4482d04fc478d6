extern crate crayon_spatial;
#[macro_use]
extern crate approx;
extern crate rand;

use std::cell::RefCell;
use std::rc::Rc;

use crayon_spatial::math::{Deg, Euler};
use crayon_spatial::prelude::*;

#[test]
pub fn hierarchy() {
    let mut graph = SceneGraph::new();
    let e1 = graph.create("e1");
    let e2 = graph.create("e2");
    let e3 = graph.create("e3");
    let e4 = graph.create("e4");

    graph.set_parent(e4, e3, false).unwrap();
    graph.set_parent(e3, e1, false).unwrap();
    graph.set_parent(e2, e1, false).unwrap();
    // e1 <- (e3 <- (e4), e2)

    assert!(graph.is_ancestor(e2, e1));
    assert!(graph.is_ancestor(e3, e1));
    assert!(graph.is_ancestor(e4, e1));
    assert!(graph.is_ancestor(e4, e3));

    assert!(!graph.is_ancestor(e1, e1));
    assert!(!graph.is_ancestor(e1, e2));
    assert!(!graph.is_ancestor(e1, e3));
    assert!(!graph.is_ancestor(e1, e4));
    assert!(!graph.is_ancestor(e2, e4));

    assert!(graph.is_root(e1));
    assert!(!graph.is_root(e2));
    assert!(!graph.is_root(e3));
    assert!(!graph.is_root(e4));

    assert!(!graph.is_leaf(e1));
    assert!(graph.is_leaf(e2));
    assert!(!graph.is_leaf(e3));
    assert!(graph.is_leaf(e4));

    assert_eq!(graph.roots(), &[e1]);
    assert_eq!(graph.children(e1), &[e3, e2]);
    assert_eq!(graph.child_count(e1), 2);
    assert_eq!(graph.parent(e4), Some(e3));
    assert_eq!(graph.parent(e1), None);

    let point = Vec3::new(1.0, 0.0, 0.0);
    graph.set_position(e3, point).unwrap();
    assert_ulps_eq!(graph.position(e4).unwrap(), point);

    graph.set_position(e1, [1.0, 0.0, 2.0]).unwrap();
    assert_ulps_eq!(graph.position(e4).unwrap(), Vec3::new(2.0, 0.0, 2.0));

    assert_ulps_eq!(graph.local_position(e4).unwrap(), Vec3::new(0.0, 0.0, 0.0));
    graph.set_parent(e4, Some(e2), false).unwrap();
    assert_ulps_eq!(graph.position(e4).unwrap(), Vec3::new(1.0, 0.0, 2.0));
    assert_ulps_eq!(graph.local_position(e4).unwrap(), Vec3::new(0.0, 0.0, 0.0));

    graph.set_local_position(e2, [1.0, 0.0, 0.0]).unwrap();
    let euler = Euler::new(Deg(0.0), Deg(90.0), Deg(0.0));
    graph.set_rotation(e1, euler).unwrap();
    assert_relative_eq!(
        graph.position(e2).unwrap(),
        Vec3::new(1.0, 0.0, 1.0),
        epsilon = 1e-5
    );
}

#[test]
fn invalid_parent() {
    let mut graph = SceneGraph::new();
    let e1 = graph.create("e1");
    let e2 = graph.create("e2");
    let e3 = graph.create("e3");

    graph.set_parent(e2, e1, false).unwrap();
    graph.set_parent(e3, e2, false).unwrap();

    assert!(match graph.set_parent(e1, e1, false) {
        Err(Error::CanNotAttachSelfAsParent(v)) => v == e1,
        _ => false,
    });

    assert!(match graph.set_parent(e1, e3, false) {
        Err(Error::CyclicHierarchy { node, parent }) => node == e1 && parent == e3,
        _ => false,
    });

    assert!(match graph.set_parent(e1, e2, true) {
        Err(Error::CyclicHierarchy { .. }) => true,
        _ => false,
    });

    // Rejections leave the hierarchy untouched.
    assert_eq!(graph.roots(), &[e1]);
    assert_eq!(graph.children(e1), &[e2]);
    assert_eq!(graph.children(e2), &[e3]);
    assert_eq!(graph.parent(e1), None);
}

#[test]
fn keep_world_pose() {
    let mut graph = SceneGraph::new();
    let e1 = graph.create("e1");
    let e2 = graph.create("e2");
    let e3 = graph.create("e3");

    graph.set_position(e1, [0.0, 1.0, 0.0]).unwrap();
    assert_ulps_eq!(graph.position(e1).unwrap(), Vec3::new(0.0, 1.0, 0.0));
    assert_ulps_eq!(graph.local_position(e1).unwrap(), Vec3::new(0.0, 1.0, 0.0));

    graph.set_position(e2, [1.0, 0.0, 0.0]).unwrap();
    graph.set_position(e3, [0.0, 0.0, 1.0]).unwrap();

    graph.set_parent(e2, e1, false).unwrap();
    assert_ulps_eq!(graph.local_position(e2).unwrap(), Vec3::new(1.0, 0.0, 0.0));
    assert_ulps_eq!(graph.position(e2).unwrap(), Vec3::new(1.0, 1.0, 0.0));

    graph.remove_from_parent(e2, true).unwrap();
    assert_ulps_eq!(graph.position(e2).unwrap(), Vec3::new(1.0, 1.0, 0.0));

    graph.set_parent(e3, e1, true).unwrap();
    assert_ulps_eq!(graph.local_position(e3).unwrap(), Vec3::new(0.0, -1.0, 1.0));
    assert_ulps_eq!(graph.position(e3).unwrap(), Vec3::new(0.0, 0.0, 1.0));

    graph.remove_from_parent(e3, false).unwrap();
    assert_ulps_eq!(graph.position(e3).unwrap(), Vec3::new(0.0, -1.0, 1.0));
}

#[test]
fn keep_world_pose_under_rotated_parent() {
    let mut graph = SceneGraph::new();
    let parent = graph.create("parent");
    let child = graph.create("child");

    graph.set_local_position(parent, [2.0, 2.0, 0.0]).unwrap();
    graph.set_local_position(child, [5.0, 5.0, 0.0]).unwrap();

    graph.set_parent(child, parent, true).unwrap();
    assert_relative_eq!(
        graph.position(child).unwrap(),
        Vec3::new(5.0, 5.0, 0.0),
        epsilon = 1e-5
    );
    assert_relative_eq!(
        graph.local_position(child).unwrap(),
        Vec3::new(3.0, 3.0, 0.0),
        epsilon = 1e-5
    );

    graph.remove_from_parent(child, true).unwrap();
    graph
        .set_local_rotation(parent, Euler::new(Deg(0.0), Deg(0.0), Deg(90.0)))
        .unwrap();
    graph.set_local_scale(parent, [2.0, 2.0, 2.0]).unwrap();

    let world = graph.transform(child).unwrap();
    graph.set_parent(child, parent, true).unwrap();

    let after = graph.transform(child).unwrap();
    assert_relative_eq!(after.position, world.position, epsilon = 1e-4);
    assert_relative_eq!(after.scale, world.scale, epsilon = 1e-4);
    assert_relative_eq!(
        graph.local_scale(child).unwrap(),
        Vec3::new(0.5, 0.5, 0.5),
        epsilon = 1e-4
    );
}

#[test]
fn sibling_index() {
    let mut graph = SceneGraph::new();
    let parent = graph.create("parent");

    let mut nodes = Vec::new();
    for i in 0..16 {
        let v = graph.create(format!("n{}", i));
        graph.set_parent(v, parent, false).unwrap();
        nodes.push(v);
    }

    graph.set_as_first_sibling(nodes[5]).unwrap();
    assert_eq!(graph.children(parent)[0], nodes[5]);
    assert_eq!(graph.sibling_index(nodes[0]), Some(1));

    graph.set_as_last_sibling(nodes[5]).unwrap();
    assert_eq!(graph.children(parent)[15], nodes[5]);

    graph.set_sibling_index(nodes[3], 1024).unwrap();
    assert_eq!(graph.sibling_index(nodes[3]), Some(15));

    let check = |graph: &SceneGraph| {
        for (i, &v) in graph.children(parent).iter().enumerate() {
            assert_eq!(graph.sibling_index(v), Some(i));
            assert_eq!(graph.parent(v), Some(parent));
        }

        for (i, &v) in graph.roots().iter().enumerate() {
            assert_eq!(graph.sibling_index(v), Some(i));
            assert_eq!(graph.parent(v), None);
        }
    };

    for _ in 0..256 {
        let v = nodes[rand::random::<usize>() % nodes.len()];
        match rand::random::<usize>() % 3 {
            0 => {
                let index = rand::random::<usize>() % 20;
                graph.set_sibling_index(v, index).unwrap();
            }
            1 => graph.remove_from_parent(v, false).unwrap(),
            _ => graph.set_parent(v, parent, false).unwrap(),
        }

        check(&graph);
    }
}

#[test]
fn iteration() {
    let mut graph = SceneGraph::new();
    let e1 = graph.create("e1");
    let e2 = graph.create("e2");
    let e3 = graph.create("e3");
    let e4 = graph.create("e4");
    let e5 = graph.create("e5");
    let e6 = graph.create("e6");

    // e1 <- (e2, e3 <- e4 <- (e5, e6))

    graph.set_parent(e2, e1, false).unwrap();
    graph.set_parent(e3, e1, false).unwrap();
    graph.set_parent(e4, e3, false).unwrap();
    graph.set_parent(e5, e4, false).unwrap();
    graph.set_parent(e6, e4, false).unwrap();

    assert_eq!(
        graph.descendants(e1).collect::<Vec<_>>(),
        [e2, e3, e4, e5, e6]
    );

    assert_eq!(graph.children(e1), &[e2, e3]);
    assert_eq!(graph.ancestors(e1).count(), 0);
    assert_eq!(graph.ancestors(e2).collect::<Vec<_>>(), [e1]);
    assert_eq!(graph.ancestors(e4).collect::<Vec<_>>(), [e3, e1]);
    assert_eq!(graph.ancestors(e6).collect::<Vec<_>>(), [e4, e3, e1]);

    let mut pre = Vec::new();
    let mut post = Vec::new();
    graph
        .walk(e1, |v, _| pre.push(v), |v, _| post.push(v))
        .unwrap();

    assert_eq!(pre, [e1, e2, e3, e4, e5, e6]);
    assert_eq!(post, [e2, e5, e6, e4, e3, e1]);
}

#[test]
fn random_iteration() {
    let mut graph = SceneGraph::new();

    let mut nodes = vec![];
    for _ in 0..255 {
        nodes.push(graph.create(""));
    }

    let mut constructed = vec![];
    constructed.push(nodes.pop().unwrap());

    let mut count = 0;
    for i in 0..254 {
        let idx = rand::random::<usize>() % nodes.len();
        let pidx = rand::random::<usize>() % constructed.len();

        if pidx == 0 {
            count += 1;
        }

        graph
            .set_parent(nodes[idx], constructed[pidx], false)
            .unwrap();

        let len = graph.descendants(constructed[0]).count();
        assert_eq!(len, i + 1);

        constructed.push(nodes[idx]);
        nodes.remove(idx);
    }

    assert_eq!(graph.child_count(constructed[0]), count);

    let mut visits = ::std::collections::HashMap::new();
    let mut post = Vec::new();
    graph
        .walk(
            constructed[0],
            |v, _| *visits.entry(v).or_insert(0) += 1,
            |v, _| post.push(v),
        )
        .unwrap();

    assert_eq!(visits.len(), 255);
    assert!(visits.values().all(|&v| v == 1));
    assert_eq!(post.len(), 255);

    // Every node is finished after all of its descendants.
    for (i, &v) in post.iter().enumerate() {
        for d in graph.descendants(v) {
            assert!(post.iter().position(|&w| w == d).unwrap() < i);
        }
    }
}

#[test]
fn remove() {
    let mut graph = SceneGraph::new();
    let e1 = graph.create("e1");
    let e2 = graph.create("e2");
    let e3 = graph.create("e3");
    let e4 = graph.create("e4");
    let e5 = graph.create("e5");
    let e6 = graph.create("e6");

    graph.set_parent(e2, e1, false).unwrap();
    graph.set_parent(e3, e1, false).unwrap();
    graph.set_parent(e4, e3, false).unwrap();
    graph.set_parent(e5, e3, false).unwrap();
    graph.set_parent(e6, e5, false).unwrap();
    // e1 <- (e2, e3 <- (e4, e5 <- e6))

    assert!(graph.len() == 6);

    let removes = graph.remove(e3).unwrap();
    assert_eq!(removes, [e4, e6, e5, e3]);

    assert!(graph.contains(e1));
    assert!(graph.contains(e2));
    assert!(!graph.contains(e3));
    assert!(!graph.contains(e4));
    assert!(!graph.contains(e5));
    assert!(!graph.contains(e6));
    assert!(graph.len() == 2);
    assert_eq!(graph.children(e1), &[e2]);
    assert_eq!(graph.sibling_index(e2), Some(0));

    assert_eq!(graph.lifecycle(e6), Lifecycle::Destroyed);
    assert!(match graph.position(e6) {
        Err(Error::NodeNotFound(v)) => v == e6,
        _ => false,
    });
    assert!(match graph.set_parent(e6, e1, false) {
        Err(Error::NodeNotFound(_)) => true,
        _ => false,
    });
    assert!(graph.remove(e3).is_err());

    // Recycled slots never alias stale handles.
    let e7 = graph.create("e7");
    assert!(graph.contains(e7));
    assert!(!graph.contains(e3));
    assert!(!graph.contains(e4));
    assert!(!graph.contains(e5));
    assert!(!graph.contains(e6));
}

#[test]
fn remove_and_detach_children() {
    let mut graph = SceneGraph::new();
    let e1 = graph.create("e1");
    let e2 = graph.create("e2");
    let e3 = graph.create("e3");
    let e4 = graph.create("e4");

    graph.set_parent(e2, e1, false).unwrap();
    graph.set_parent(e3, e2, false).unwrap();
    graph.set_parent(e4, e2, false).unwrap();
    // e1 <- e2 <- (e3, e4)

    graph.set_local_position(e1, [1.0, 0.0, 0.0]).unwrap();
    graph.set_local_position(e2, [0.0, 2.0, 0.0]).unwrap();
    graph.set_local_position(e3, [0.0, 0.0, 3.0]).unwrap();

    let removes = graph.remove_with(e2, DestroyPolicy::DetachChildren).unwrap();
    assert_eq!(removes, [e2]);
    assert_eq!(graph.children(e1), &[e3, e4]);
    assert_eq!(graph.parent(e3), Some(e1));

    assert_relative_eq!(graph.position(e3).unwrap(), Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-5);
    assert_relative_eq!(graph.position(e4).unwrap(), Vec3::new(1.0, 2.0, 0.0), epsilon = 1e-5);
    assert_relative_eq!(
        graph.local_position(e3).unwrap(),
        Vec3::new(0.0, 2.0, 3.0),
        epsilon = 1e-5
    );

    // Removing a root detaches its children into roots.
    graph.remove_with(e1, DestroyPolicy::DetachChildren).unwrap();
    assert_eq!(graph.roots(), &[e3, e4]);
    assert_eq!(graph.lifecycle(e3), Lifecycle::Detached);
    assert_relative_eq!(graph.position(e3).unwrap(), Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-5);
}

#[test]
fn events() {
    let mut graph = SceneGraph::new();
    let e1 = graph.create("e1");
    let e2 = graph.create("e2");
    let e3 = graph.create("e3");
    graph.set_parent(e3, e1, false).unwrap();

    let records = Rc::new(RefCell::new(Vec::new()));
    let handle = {
        let records = records.clone();
        graph.subscribe(move |e: &HierarchyEvent| records.borrow_mut().push(*e))
    };

    graph.set_parent(e3, e2, false).unwrap();
    assert_eq!(
        *records.borrow(),
        [
            HierarchyEvent::ChildRemoved {
                parent: e1,
                child: e3
            },
            HierarchyEvent::ChildAdded {
                parent: e2,
                child: e3
            },
            HierarchyEvent::ParentChanged {
                node: e3,
                old_parent: Some(e1)
            },
        ]
    );

    records.borrow_mut().clear();
    graph.set_parent(e3, e2, false).unwrap();
    assert!(records.borrow().is_empty());

    graph.set_sibling_index(e1, 1).unwrap();
    assert_eq!(
        *records.borrow(),
        [
            HierarchyEvent::SiblingIndexChanged { node: e1 },
            HierarchyEvent::SiblingIndexChanged { node: e2 },
        ]
    );
    assert_eq!(records.borrow()[0].target(), e1);
    assert_eq!(graph.sibling_index(e2), Some(0));

    records.borrow_mut().clear();
    graph.set_sibling_index(e1, 1).unwrap();
    assert!(records.borrow().is_empty());

    graph.remove_from_parent(e3, false).unwrap();
    assert_eq!(
        *records.borrow(),
        [
            HierarchyEvent::ChildRemoved {
                parent: e2,
                child: e3
            },
            HierarchyEvent::ParentChanged {
                node: e3,
                old_parent: Some(e2)
            },
        ]
    );

    assert!(graph.unsubscribe(handle));
    assert!(!graph.unsubscribe(handle));

    records.borrow_mut().clear();
    graph.set_parent(e3, e1, false).unwrap();
    assert!(records.borrow().is_empty());
}

#[test]
fn find() {
    let mut graph = SceneGraph::new();
    let e1 = graph.create("room");
    let e2 = graph.create("table");
    let e3 = graph.create("lamp");
    let e4 = graph.create("room");
    let e5 = graph.create("chair");

    graph.set_parent(e2, e1, false).unwrap();
    graph.set_parent(e3, e2, false).unwrap();
    graph.set_parent(e5, e4, false).unwrap();

    assert_eq!(graph.find("room"), Some(e1));
    assert_eq!(graph.find("room/table"), Some(e2));
    assert_eq!(graph.find("/room/table/lamp"), Some(e3));
    assert_eq!(graph.find("room//table/lamp/"), Some(e3));
    assert_eq!(graph.find("room/chair"), Some(e5));
    assert_eq!(graph.find("room/sofa"), None);
    assert_eq!(graph.find("table"), None);
    assert_eq!(graph.find(""), None);

    assert_eq!(graph.find_from(e1, "table/lamp"), Some(e3));
    assert_eq!(graph.find_from(e2, "lamp"), Some(e3));
    assert_eq!(graph.find_from(e2, ""), Some(e2));
    assert_eq!(graph.find_from(e4, "table"), None);

    graph.set_name(e3, "bulb").unwrap();
    assert_eq!(graph.name(e3), Some("bulb"));
    assert_eq!(graph.find("room/table/bulb"), Some(e3));
}

#[test]
fn activation() {
    let mut graph = SceneGraph::new();
    let e1 = graph.create("e1");
    let e2 = graph.create("e2");
    let e3 = graph.create("e3");
    let e4 = graph.create("e4");

    graph.set_parent(e2, e1, false).unwrap();
    graph.set_parent(e3, e2, false).unwrap();
    // e1 <- e2 <- e3, e4

    graph.set_active(e2, false).unwrap();
    assert!(graph.is_active_in_hierarchy(e1));
    assert!(!graph.is_active(e2));
    assert!(!graph.is_active_in_hierarchy(e2));
    assert!(graph.is_active(e3));
    assert!(!graph.is_active_in_hierarchy(e3));

    graph.set_parent(e4, e3, false).unwrap();
    assert!(!graph.is_active_in_hierarchy(e4));

    graph.remove_from_parent(e3, false).unwrap();
    assert!(graph.is_active_in_hierarchy(e3));
    assert!(graph.is_active_in_hierarchy(e4));

    graph.set_parent(e3, e2, false).unwrap();
    graph.set_active(e2, true).unwrap();
    graph.set_active(e1, false).unwrap();
    assert!(!graph.is_active_in_hierarchy(e4));

    graph.set_active(e1, true).unwrap();
    assert!(graph.is_active_in_hierarchy(e4));
    assert!(graph.node(e4).unwrap().is_active_in_hierarchy());
}
