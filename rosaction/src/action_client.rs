//! Typed client for the actionlib goal/cancel/result protocol.

use std::{
    fmt,
    marker::PhantomData,
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use serde::{de::DeserializeOwned, Serialize};

use crate::{
    discovery::{self, ActionTopics},
    error::Error,
    master::MasterClient,
    rosrust_utils::{deadline_after, wait_subscriber, FifoSubscriber},
    status::{result_outcome, GoalStatus},
    yaml::goal_from_yaml,
};

const MONITOR_RATE_HZ: f64 = 10.0;

/// One actionlib message family.
///
/// Implementations are normally written by [`define_action!`] against a
/// `rosmsg_include!`-generated module; the four functions carry the
/// field access that cannot be expressed generically over generated
/// types.
pub trait Action {
    /// `<Base>Goal`.
    type Goal: rosrust::Message;
    /// `<Base>Result`.
    type Result: rosrust::Message;
    /// `<Base>Feedback`.
    type Feedback: rosrust::Message;
    /// `<Base>ActionGoal`.
    type ActionGoal: rosrust::Message;
    /// `<Base>ActionResult`.
    type ActionResult: rosrust::Message;
    /// `<Base>ActionFeedback`.
    type ActionFeedback: rosrust::Message;
    /// `actionlib_msgs/GoalID`.
    type Cancel: rosrust::Message;

    /// Wraps `goal` into the `ActionGoal` envelope under `goal_id`.
    fn action_goal(goal: Self::Goal, goal_id: String, stamp: rosrust::Time) -> Self::ActionGoal;

    /// Splits an `ActionResult` into its status and result payload.
    fn split_result(result: Self::ActionResult) -> (GoalStatus, Self::Result);

    /// Splits an `ActionFeedback` into its status and feedback payload.
    fn split_feedback(feedback: Self::ActionFeedback) -> (GoalStatus, Self::Feedback);

    /// Cancel request for `goal_id`; an empty id addresses every goal.
    fn cancel_message(goal_id: String) -> Self::Cancel;
}

/// Implements [`Action`] against a `rosmsg_include!`-generated message
/// family.
///
/// `$msgs` is the module holding the `<base>` action messages and
/// `$actionlib_msgs` the generated `actionlib_msgs` module; both come
/// out of the same `rosmsg_include!` invocation.
///
/// ```ignore
/// mod msg {
///     rosrust::rosmsg_include!(move_base_msgs / MoveBaseAction);
/// }
///
/// rosaction::define_action!(MoveBase, msg::move_base_msgs, msg::actionlib_msgs, MoveBase);
///
/// let client = rosaction::ActionClient::<MoveBase>::connect("/move_base", 1)?;
/// ```
#[macro_export]
macro_rules! define_action {
    ($name:ident, $msgs:path, $actionlib_msgs:path, $base:ident) => {
        $crate::paste::item! {
            pub struct $name;

            impl $crate::Action for $name {
                type Goal = $msgs::[<$base Goal>];
                type Result = $msgs::[<$base Result>];
                type Feedback = $msgs::[<$base Feedback>];
                type ActionGoal = $msgs::[<$base ActionGoal>];
                type ActionResult = $msgs::[<$base ActionResult>];
                type ActionFeedback = $msgs::[<$base ActionFeedback>];
                type Cancel = $actionlib_msgs::GoalID;

                fn action_goal(
                    goal: Self::Goal,
                    goal_id: String,
                    stamp: rosrust::Time,
                ) -> Self::ActionGoal {
                    let mut action_goal = <Self::ActionGoal>::default();
                    action_goal.header.stamp = stamp;
                    action_goal.goal_id.id = goal_id;
                    action_goal.goal_id.stamp = stamp;
                    action_goal.goal = goal;
                    action_goal
                }

                fn split_result(
                    result: Self::ActionResult,
                ) -> ($crate::GoalStatus, Self::Result) {
                    let status = $crate::GoalStatus {
                        goal_id: result.status.goal_id.id,
                        code: result.status.status,
                        text: result.status.text,
                    };
                    (status, result.result)
                }

                fn split_feedback(
                    feedback: Self::ActionFeedback,
                ) -> ($crate::GoalStatus, Self::Feedback) {
                    let status = $crate::GoalStatus {
                        goal_id: feedback.status.goal_id.id,
                        code: feedback.status.status,
                        text: feedback.status.text,
                    };
                    (status, feedback.feedback)
                }

                fn cancel_message(goal_id: String) -> Self::Cancel {
                    $actionlib_msgs::GoalID {
                        id: goal_id,
                        ..Default::default()
                    }
                }
            }
        }
    };
}

/// Client side of one action namespace.
///
/// Publishes `{ns}/goal` and `{ns}/cancel`, listens on `{ns}/result`
/// and `{ns}/feedback`. The embedding node must have called
/// `rosrust::init` before connecting.
pub struct ActionClient<A: Action> {
    topics: ActionTopics,
    goal_publisher: rosrust::Publisher<A::ActionGoal>,
    cancel_publisher: rosrust::Publisher<A::Cancel>,
    result_subscriber: FifoSubscriber<A::ActionResult>,
    feedback_subscriber: FifoSubscriber<A::ActionFeedback>,
    goal_seq: AtomicUsize,
    _action: PhantomData<fn() -> A>,
}

impl<A: Action> ActionClient<A> {
    /// Connects to the action at `namespace`.
    pub fn connect(namespace: &str, queue_size: usize) -> Result<Self, Error> {
        let topics = ActionTopics::new(namespace);
        let goal_publisher = rosrust::publish(&topics.goal, queue_size)
            .map_err(|e| Error::Ros(format!("failed to advertise {}: {e}", topics.goal)))?;
        let cancel_publisher = rosrust::publish(&topics.cancel, queue_size)
            .map_err(|e| Error::Ros(format!("failed to advertise {}: {e}", topics.cancel)))?;
        let result_subscriber = FifoSubscriber::new(&topics.result, queue_size)?;
        let feedback_subscriber = FifoSubscriber::new(&topics.feedback, queue_size)?;
        Ok(Self {
            topics,
            goal_publisher,
            cancel_publisher,
            result_subscriber,
            feedback_subscriber,
            goal_seq: AtomicUsize::new(0),
            _action: PhantomData,
        })
    }

    /// Connects after checking the registered goal, result and feedback
    /// types against `A`'s message types.
    ///
    /// Fails with [`Error::ActionNotRegistered`] when the namespace is
    /// not in the master's registry and [`Error::TypeMismatch`] when it
    /// carries a different action type.
    pub fn connect_checked(
        master: &MasterClient,
        namespace: &str,
        queue_size: usize,
    ) -> Result<Self, Error> {
        let registered = discovery::checked_goal_topic::<A::ActionGoal>(master, namespace)?
            .and(discovery::checked_result_topic::<A::ActionResult>(master, namespace)?)
            .and(discovery::checked_feedback_topic::<A::ActionFeedback>(master, namespace)?);
        if registered.is_none() {
            return Err(Error::ActionNotRegistered(namespace.to_owned()));
        }
        Self::connect(namespace, queue_size)
    }

    /// Topic names of the connected namespace.
    pub fn topics(&self) -> &ActionTopics {
        &self.topics
    }

    /// Waits until the server is connected to both command topics.
    pub fn wait_for_server(&self, timeout: Duration) -> Result<(), Error> {
        let deadline = deadline_after(timeout);
        rosrust::ros_info!("waiting for action server on {}", self.topics.goal);
        if !wait_subscriber(&self.goal_publisher, deadline, MONITOR_RATE_HZ) {
            return Err(Error::ActionServerTimeout(self.topics.goal.clone()));
        }
        if !wait_subscriber(&self.cancel_publisher, deadline, MONITOR_RATE_HZ) {
            return Err(Error::ActionServerTimeout(self.topics.cancel.clone()));
        }
        rosrust::ros_info!("action server on {} is up", self.topics.goal);
        Ok(())
    }

    /// Sends `goal` and returns its generated goal id.
    pub fn send_goal(&self, goal: A::Goal) -> Result<String, Error> {
        let goal_id = self.next_goal_id();
        let action_goal = A::action_goal(goal, goal_id.clone(), rosrust::now());
        if self.goal_publisher.send(action_goal).is_err() {
            return Err(Error::ActionGoalSendingFailure);
        }
        rosrust::ros_info!("sent goal {} on {}", goal_id, self.topics.goal);
        Ok(goal_id)
    }

    /// Builds the goal from a YAML mapping and sends it.
    pub fn send_goal_from_yaml(&self, text: &str) -> Result<String, Error>
    where
        A::Goal: Serialize + DeserializeOwned,
    {
        self.send_goal(goal_from_yaml::<A::Goal>(text)?)
    }

    /// Blocks until the result for `goal_id` arrives.
    ///
    /// A result whose status is not `SUCCEEDED` comes back as an error;
    /// results for other goals are skipped.
    pub fn wait_for_result(&self, goal_id: &str, timeout: Duration) -> Result<A::Result, Error> {
        let deadline = deadline_after(timeout);
        loop {
            let action_result = match self.result_subscriber.recv_deadline(deadline)? {
                Some(message) => message,
                None => return Err(Error::ActionResultTimeout),
            };
            let (status, result) = A::split_result(action_result);
            if status.goal_id == goal_id {
                return result_outcome(&status, result);
            }
            rosrust::ros_debug!(
                "ignoring result for goal {} on {}",
                status.goal_id,
                self.topics.result
            );
        }
    }

    /// `send_goal` followed by `wait_for_result`.
    pub fn send_goal_and_wait(&self, goal: A::Goal, timeout: Duration) -> Result<A::Result, Error> {
        let goal_id = self.send_goal(goal)?;
        self.wait_for_result(&goal_id, timeout)
    }

    /// Asks the server to cancel `goal_id`.
    pub fn cancel_goal(&self, goal_id: &str) -> Result<(), Error> {
        if self
            .cancel_publisher
            .send(A::cancel_message(goal_id.to_owned()))
            .is_err()
        {
            return Err(Error::ActionCancelSendingFailure);
        }
        Ok(())
    }

    /// Cancels everything the server is working on.
    pub fn cancel_all_goals(&self) -> Result<(), Error> {
        // An empty goal id addresses every goal, per the actionlib
        // protocol.
        self.cancel_goal("")
    }

    /// Feedback received since the last call, oldest first.
    pub fn feedbacks(&self) -> Vec<(GoalStatus, A::Feedback)> {
        self.feedback_subscriber
            .drain()
            .into_iter()
            .map(A::split_feedback)
            .collect()
    }

    fn next_goal_id(&self) -> String {
        let seq = self.goal_seq.fetch_add(1, Ordering::SeqCst);
        format_goal_id(&rosrust::name(), seq, rosrust::now())
    }
}

impl<A: Action> fmt::Debug for ActionClient<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionClient")
            .field("topics", &self.topics)
            .finish()
    }
}

fn format_goal_id(node_name: &str, seq: usize, stamp: rosrust::Time) -> String {
    format!("{node_name}-{seq}-{}", stamp.seconds())
}
