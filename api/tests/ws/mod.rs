mod attendance_ws_test;
