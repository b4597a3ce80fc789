//! Hand-rolled actionlib-shaped messages for tests.
//!
//! Mirrors the structs `rosmsg_include!` would generate for a Fibonacci
//! action, without needing message files at build time.

use std::io;

/// Field codec matching the ROS serialization layout. `rosrust` ships
/// `RosMsg` impls for scalars, strings, and time, but not for
/// sequences, so generated messages route their fields through this
/// trait instead.
trait Wire: Sized {
    fn write<W: io::Write>(&self, w: W) -> io::Result<()>;
    fn read<R: io::Read>(r: R) -> io::Result<Self>;
}

macro_rules! wire_via_rosmsg {
    ($($ty:ty),*) => {
        $(
            impl Wire for $ty {
                fn write<W: io::Write>(&self, w: W) -> io::Result<()> {
                    rosrust::RosMsg::encode(self, w)
                }

                fn read<R: io::Read>(r: R) -> io::Result<Self> {
                    rosrust::RosMsg::decode(r)
                }
            }
        )*
    };
}

wire_via_rosmsg!(u8, u32, i32, f64, String, rosrust::Time);

// Variable-length arrays go out as a u32 element count followed by the
// elements themselves.
impl<T: Wire> Wire for Vec<T> {
    fn write<W: io::Write>(&self, mut w: W) -> io::Result<()> {
        rosrust::RosMsg::encode(&(self.len() as u32), &mut w)?;
        for item in self {
            item.write(&mut w)?;
        }
        Ok(())
    }

    fn read<R: io::Read>(mut r: R) -> io::Result<Self> {
        let len: u32 = rosrust::RosMsg::decode(&mut r)?;
        (0..len).map(|_| T::read(&mut r)).collect()
    }
}

macro_rules! test_message {
    ($(#[$meta:meta])* $name:ident / $ros_type:literal { $($field:ident: $ty:ty),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name {
            $(pub $field: $ty,)*
        }

        impl rosrust::Message for $name {
            fn msg_definition() -> String {
                String::new()
            }

            fn md5sum() -> String {
                String::new()
            }

            fn msg_type() -> String {
                $ros_type.to_owned()
            }
        }

        impl crate::test_msgs::Wire for $name {
            fn write<W: std::io::Write>(&self, mut w: W) -> std::io::Result<()> {
                $(crate::test_msgs::Wire::write(&self.$field, &mut w)?;)*
                Ok(())
            }

            fn read<R: std::io::Read>(mut r: R) -> std::io::Result<Self> {
                Ok(Self {
                    $($field: crate::test_msgs::Wire::read(&mut r)?,)*
                })
            }
        }

        impl rosrust::RosMsg for $name {
            fn encode<W: std::io::Write>(&self, w: W) -> std::io::Result<()> {
                crate::test_msgs::Wire::write(self, w)
            }

            fn decode<R: std::io::Read>(r: R) -> std::io::Result<Self> {
                crate::test_msgs::Wire::read(r)
            }
        }
    };
}

pub mod std_msgs {
    test_message!(Header / "std_msgs/Header" {
        seq: u32,
        stamp: rosrust::Time,
        frame_id: String,
    });
}

pub mod actionlib_msgs {
    test_message!(GoalID / "actionlib_msgs/GoalID" {
        stamp: rosrust::Time,
        id: String,
    });

    test_message!(GoalStatus / "actionlib_msgs/GoalStatus" {
        goal_id: GoalID,
        status: u8,
        text: String,
    });
}

pub mod fib_msgs {
    use super::{actionlib_msgs, std_msgs};

    test_message!(
        #[derive(serde::Serialize, serde::Deserialize)]
        FibonacciGoal / "actionlib_tutorials/FibonacciGoal" {
            order: i32,
        }
    );

    test_message!(FibonacciResult / "actionlib_tutorials/FibonacciResult" {
        sequence: Vec<i32>,
    });

    test_message!(FibonacciFeedback / "actionlib_tutorials/FibonacciFeedback" {
        sequence: Vec<i32>,
    });

    test_message!(FibonacciActionGoal / "actionlib_tutorials/FibonacciActionGoal" {
        header: std_msgs::Header,
        goal_id: actionlib_msgs::GoalID,
        goal: FibonacciGoal,
    });

    test_message!(FibonacciActionResult / "actionlib_tutorials/FibonacciActionResult" {
        header: std_msgs::Header,
        status: actionlib_msgs::GoalStatus,
        result: FibonacciResult,
    });

    test_message!(FibonacciActionFeedback / "actionlib_tutorials/FibonacciActionFeedback" {
        header: std_msgs::Header,
        status: actionlib_msgs::GoalStatus,
        feedback: FibonacciFeedback,
    });
}

test_message!(
    #[derive(serde::Serialize, serde::Deserialize)]
    Point / "test_msgs/Point" {
        x: f64,
        y: f64,
    }
);

test_message!(
    #[derive(serde::Serialize, serde::Deserialize)]
    PlanGoal / "test_msgs/PlanGoal" {
        frame_id: String,
        target: Point,
        deadlines: Vec<f64>,
    }
);

pub use fib_msgs::FibonacciGoal;

#[test]
fn sequences_carry_a_length_prefix() {
    let result = fib_msgs::FibonacciResult {
        sequence: vec![1, 1, 2],
    };
    let mut bytes = Vec::new();
    rosrust::RosMsg::encode(&result, &mut bytes).unwrap();
    assert_eq!(bytes[..4], [3, 0, 0, 0]);
    assert_eq!(bytes.len(), 16);
    let decoded: fib_msgs::FibonacciResult = rosrust::RosMsg::decode(bytes.as_slice()).unwrap();
    assert_eq!(decoded, result);
}

#[test]
fn nested_messages_round_trip() {
    let goal = PlanGoal {
        frame_id: "map".to_owned(),
        target: Point { x: 1.0, y: 2.0 },
        deadlines: vec![0.5],
    };
    let mut bytes = Vec::new();
    rosrust::RosMsg::encode(&goal, &mut bytes).unwrap();
    let decoded: PlanGoal = rosrust::RosMsg::decode(bytes.as_slice()).unwrap();
    assert_eq!(decoded, goal);
}
